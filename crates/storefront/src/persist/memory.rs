//! In-memory key-value store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeyValueStore, PersistError};

/// Volatile store for tests and single-process development.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError> {
        let guard = self.entries.read().await;
        Ok(guard.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), PersistError> {
        let mut guard = self.entries.write().await;
        guard.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistError> {
        let mut guard = self.entries.write().await;
        guard.remove(key);
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, PersistError> {
        let guard = self.entries.read().await;
        Ok(guard
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}
