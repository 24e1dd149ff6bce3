//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::Mutex;

use goodstock_core::ShopperId;

use crate::backend::{BackendError, ProductSource, RestProductSource, StaticProductSource};
use crate::catalog::{Catalog, CatalogError};
use crate::config::StorefrontConfig;
use crate::persist::{FileStore, KeyValueStore, PersistError, PersistQueue};
use crate::session::ShopperSession;

/// Idle time after which a shopper's in-memory session is dropped.
const SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

/// Maximum number of shopper sessions kept in memory.
const MAX_SESSIONS: u64 = 10_000;

/// Handle to one shopper's state. Lock it for the whole mutation.
pub type SharedSession = Arc<Mutex<ShopperSession>>;

/// Error building application state from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("backend: {0}")]
    Backend(#[from] BackendError),
    #[error("persistence: {0}")]
    Persist(#[from] PersistError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the product backend and per-shopper sessions.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    products: Arc<dyn ProductSource>,
    store: Arc<dyn KeyValueStore>,
    queue: PersistQueue,
    sessions: Cache<ShopperId, SharedSession>,
}

impl AppState {
    /// Create application state from its parts.
    ///
    /// Spawns the persist queue writer, so this must run inside a Tokio runtime.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: Catalog,
        products: Arc<dyn ProductSource>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let (queue, _writer) = PersistQueue::spawn(Arc::clone(&store));
        let sessions = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_idle(SESSION_IDLE)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                products,
                store,
                queue,
                sessions,
            }),
        }
    }

    /// Build state from configuration: catalog file or built-in catalog,
    /// hosted backend or product seed file, and a file store in the data dir.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog or product file is invalid, the backend
    /// URL is malformed, or the data directory cannot be created.
    pub async fn from_config(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::builtin(),
        };
        tracing::info!(categories = catalog.len(), "Catalog loaded");

        let products: Arc<dyn ProductSource> = match (&config.backend, &config.products_path) {
            (Some(backend), _) => {
                tracing::info!(url = %backend.url, "Using hosted product backend");
                Arc::new(RestProductSource::new(backend)?)
            }
            (None, Some(path)) => {
                let source = StaticProductSource::from_path(path)?;
                tracing::info!(products = source.products().len(), "Using product seed file");
                Arc::new(source)
            }
            (None, None) => {
                tracing::warn!("No product backend configured, product lookups will fail");
                Arc::new(StaticProductSource::default())
            }
        };

        let store = Arc::new(FileStore::open(&config.data_dir).await?);
        tracing::info!(data_dir = %config.data_dir.display(), "Persisting shopper state");

        Ok(Self::new(config, catalog, products, store))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the category catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the product backend.
    #[must_use]
    pub fn products(&self) -> &dyn ProductSource {
        self.inner.products.as_ref()
    }

    /// Get a reference to the persisted state store.
    #[must_use]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.inner.store.as_ref()
    }

    /// Get a shared handle to the persisted state store.
    #[must_use]
    pub fn shared_store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.inner.store)
    }

    /// Get a handle to the persist queue.
    #[must_use]
    pub fn queue(&self) -> &PersistQueue {
        &self.inner.queue
    }

    /// Get the shopper's session, restoring it on first use.
    ///
    /// Concurrent first requests for the same shopper share one restore.
    pub async fn session(&self, shopper: &ShopperId) -> SharedSession {
        let inner = &self.inner;
        inner
            .sessions
            .get_with(shopper.clone(), async {
                // A previous session for this shopper may still have writes queued
                if let Err(e) = inner.queue.flush().await {
                    tracing::warn!(error = %e, "Failed to flush before restoring session");
                }
                let session = ShopperSession::open(
                    shopper.clone(),
                    inner.store.as_ref(),
                    &inner.queue,
                    inner.config.cart_summary,
                )
                .await;
                Arc::new(Mutex::new(session))
            })
            .await
    }

    /// Close every open session and wait for all pending writes.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::QueueClosed` if the writer task has stopped.
    pub async fn shutdown(&self) -> Result<(), PersistError> {
        let sessions: Vec<SharedSession> = self
            .inner
            .sessions
            .iter()
            .map(|(_, session)| session)
            .collect();
        tracing::info!(sessions = sessions.len(), "Closing shopper sessions");

        for session in sessions {
            session.lock().await.close().await?;
        }
        self.inner.queue.flush().await?;
        self.inner.sessions.invalidate_all();
        Ok(())
    }
}
