//! Session middleware configuration.
//!
//! Sessions only carry the shopper's identity. Records are kept in the same
//! key-value store as carts and wishlists, so a shopper keeps their cart
//! across server restarts for as long as the cookie lives.

use std::sync::Arc;

use async_trait::async_trait;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, SessionStore};
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::config::StorefrontConfig;
use crate::persist::{KEY_PREFIX, KeyValueStore};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "gs_session";

/// Session expiry time in seconds (30 days).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Session store on top of a [`KeyValueStore`].
///
/// Records live under `goodstock:session:{id}`. Expired records are treated
/// as missing and removed when next loaded.
#[derive(Clone)]
pub struct KvSessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for KvSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvSessionStore").finish_non_exhaustive()
    }
}

impl KvSessionStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(id: &Id) -> String {
        format!("{KEY_PREFIX}:session:{id}")
    }
}

fn backend(err: impl std::fmt::Display) -> session_store::Error {
    session_store::Error::Backend(err.to_string())
}

#[async_trait]
impl SessionStore for KvSessionStore {
    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let value =
            serde_json::to_vec(record).map_err(|e| session_store::Error::Encode(e.to_string()))?;
        self.store
            .put(&Self::key(&record.id), value)
            .await
            .map_err(backend)
    }

    async fn load(&self, id: &Id) -> session_store::Result<Option<Record>> {
        let key = Self::key(id);
        let Some(bytes) = self.store.get(&key).await.map_err(backend)? else {
            return Ok(None);
        };
        let record: Record = serde_json::from_slice(&bytes)
            .map_err(|e| session_store::Error::Decode(e.to_string()))?;

        if record.expiry_date <= OffsetDateTime::now_utc() {
            self.store.remove(&key).await.map_err(backend)?;
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn delete(&self, id: &Id) -> session_store::Result<()> {
        self.store.remove(&Self::key(id)).await.map_err(backend)
    }
}

/// Create the session layer backed by the shopper state store.
#[must_use]
pub fn create_session_layer(
    store: Arc<dyn KeyValueStore>,
    config: &StorefrontConfig,
) -> SessionManagerLayer<KvSessionStore> {
    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(KvSessionStore::new(store))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::persist::MemoryStore;

    fn record(expiry_date: OffsetDateTime) -> Record {
        let mut data = HashMap::new();
        data.insert("shopper_id".to_string(), serde_json::json!("s1"));
        Record {
            id: Id::default(),
            data,
            expiry_date,
        }
    }

    #[tokio::test]
    async fn test_save_load_delete() {
        let sessions = KvSessionStore::new(Arc::new(MemoryStore::new()));
        let record = record(OffsetDateTime::now_utc() + tower_sessions::cookie::time::Duration::hours(1));

        sessions.save(&record).await.unwrap();
        let loaded = sessions.load(&record.id).await.unwrap().unwrap();
        assert_eq!(loaded.data, record.data);

        sessions.delete(&record.id).await.unwrap();
        assert!(sessions.load(&record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_record_is_missing() {
        let store = Arc::new(MemoryStore::new());
        let sessions = KvSessionStore::new(store.clone());
        let record = record(OffsetDateTime::now_utc() - tower_sessions::cookie::time::Duration::hours(1));

        sessions.save(&record).await.unwrap();
        assert!(sessions.load(&record.id).await.unwrap().is_none());
        assert!(store.keys("goodstock:session:").await.unwrap().is_empty());
    }
}
