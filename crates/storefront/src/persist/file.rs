//! Filesystem key-value store: one JSON file per key.
//!
//! Keys map to file names by replacing `:` with `~`, which never appears in a
//! valid key. Writes go to a temporary file first and are renamed into place
//! so a crash never leaves a half-written blob behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{KeyValueStore, PersistError};

const EXTENSION: &str = "json";

/// Directory-backed store.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::Io` if the directory cannot be created.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Directory holding the blobs.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
            && !key.starts_with('.');
        if !valid {
            return Err(PersistError::InvalidKey(key.to_owned()));
        }
        Ok(self
            .root
            .join(format!("{}.{EXTENSION}", key.replace(':', "~"))))
    }
}

fn key_from_file_name(name: &str) -> Option<String> {
    let stem = name.strip_suffix(EXTENSION)?.strip_suffix('.')?;
    Some(stem.replace('~', ":"))
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), PersistError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, PersistError> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(key) = name.to_str().and_then(key_from_file_name) else {
                continue;
            };
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        store
            .put("goodstock:cart:abc", b"{}".to_vec())
            .await
            .unwrap();
        assert!(dir.path().join("goodstock~cart~abc.json").exists());
        assert_eq!(
            store.get("goodstock:cart:abc").await.unwrap().unwrap(),
            b"{}"
        );

        store.remove("goodstock:cart:abc").await.unwrap();
        assert!(store.get("goodstock:cart:abc").await.unwrap().is_none());
        store.remove("goodstock:cart:abc").await.unwrap();
    }

    #[tokio::test]
    async fn test_overwrite_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        store.put("k", b"1".to_vec()).await.unwrap();
        store.put("k", b"2".to_vec()).await.unwrap();

        assert_eq!(store.get("k").await.unwrap().unwrap(), b"2");
        assert!(!dir.path().join("k.tmp").exists());
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        for key in ["../escape", "a/b", "", ".hidden"] {
            assert!(matches!(
                store.put(key, vec![]).await,
                Err(PersistError::InvalidKey(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_keys_lists_only_blobs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        store.put("goodstock:wishlist:b", vec![]).await.unwrap();
        store.put("goodstock:cart:a", vec![]).await.unwrap();
        std::fs::write(dir.path().join("README.txt"), "ignore me").unwrap();

        let keys = store.keys("goodstock:").await.unwrap();
        assert_eq!(keys, vec!["goodstock:cart:a", "goodstock:wishlist:b"]);
    }
}
