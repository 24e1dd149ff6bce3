//! Persistence of shopper state to an external key-value store.
//!
//! # Layout
//!
//! Each shopper owns two independent blobs:
//!
//! ```text
//! goodstock:cart:{shopper_id}      -> Envelope<CartLines>
//! goodstock:wishlist:{shopper_id}  -> Envelope<WishlistItems>
//! ```
//!
//! Every blob is a JSON envelope carrying a schema version:
//!
//! ```json
//! { "version": 1, "saved_at": "2026-01-01T00:00:00Z", "data": [ ... ] }
//! ```
//!
//! # Failure Model
//!
//! - Writes go through [`PersistQueue`] and are best-effort: failures are
//!   logged and never undo the in-memory change.
//! - Restores never fail: missing, corrupt or unknown-version blobs yield the
//!   empty default.

pub mod file;
pub mod memory;
mod queue;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use queue::{PersistQueue, PersistTarget};

#[cfg(test)]
pub(crate) use queue::tests::BrokenStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use goodstock_core::ShopperId;

/// Current schema version written into every envelope.
pub const SCHEMA_VERSION: u32 = 1;

/// Prefix shared by every storage key.
pub const KEY_PREFIX: &str = "goodstock";

/// Errors that can occur when reading or writing persisted state.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Blob could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Blob was written by an incompatible schema.
    #[error("unsupported schema version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the blob.
        found: u32,
        /// Version this build understands.
        expected: u32,
    },

    /// Key contains characters the backend cannot store.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// The writer task has stopped.
    #[error("persist queue closed")]
    QueueClosed,
}

/// Abstraction for key-value storage backends.
///
/// Enables multiple implementations (in-memory, file system, hosted storage)
/// without coupling the stores to a specific mechanism.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a blob. Returns `None` if the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError>;

    /// Write a blob, replacing any previous value.
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), PersistError>;

    /// Remove a blob. Returns `Ok` even if the key doesn't exist.
    async fn remove(&self, key: &str) -> Result<(), PersistError>;

    /// List keys starting with `prefix`, sorted.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, PersistError>;
}

/// Which store a blob belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobKind {
    Cart,
    Wishlist,
}

impl BlobKind {
    /// Key segment for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Wishlist => "wishlist",
        }
    }
}

/// Build the storage key for a shopper's blob.
#[must_use]
pub fn storage_key(kind: BlobKind, shopper: &ShopperId) -> String {
    format!("{KEY_PREFIX}:{}:{shopper}", kind.as_str())
}

/// Split a storage key back into its kind and shopper.
///
/// Returns `None` for keys not written by this crate.
#[must_use]
pub fn parse_storage_key(key: &str) -> Option<(BlobKind, ShopperId)> {
    let rest = key.strip_prefix(KEY_PREFIX)?.strip_prefix(':')?;
    let (kind, shopper) = rest.split_once(':')?;
    let kind = match kind {
        "cart" => BlobKind::Cart,
        "wishlist" => BlobKind::Wishlist,
        _ => return None,
    };
    ShopperId::parse(shopper).ok().map(|id| (kind, id))
}

/// Versioned wrapper around a persisted value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub data: T,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Encode a value into a versioned JSON blob.
///
/// # Errors
///
/// Returns `PersistError::Json` if serialization fails.
pub fn encode<T: Serialize>(data: &T) -> Result<Vec<u8>, PersistError> {
    let envelope = Envelope {
        version: SCHEMA_VERSION,
        saved_at: Utc::now(),
        data,
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Decode a versioned JSON blob.
///
/// The version is checked before the payload is interpreted, so a future
/// shape change is reported as `UnsupportedVersion` rather than a parse error.
///
/// # Errors
///
/// Returns `PersistError::Json` for malformed blobs and
/// `PersistError::UnsupportedVersion` for blobs from another schema.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<Envelope<T>, PersistError> {
    let probe: VersionProbe = serde_json::from_slice(bytes)?;
    if probe.version != SCHEMA_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found: probe.version,
            expected: SCHEMA_VERSION,
        });
    }
    Ok(serde_json::from_slice(bytes)?)
}

/// Load a value from the store, falling back to the default on any failure.
pub async fn restore<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match store.get(key).await {
        Ok(None) => T::default(),
        Ok(Some(bytes)) => match decode::<T>(&bytes) {
            Ok(envelope) => {
                tracing::debug!(key, saved_at = %envelope.saved_at, "Restored persisted state");
                envelope.data
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding unreadable persisted state");
                T::default()
            }
        },
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read persisted state, starting empty");
            T::default()
        }
    }
}
