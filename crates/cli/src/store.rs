//! File-backed persistent store.
//!
//! All keys live in one JSON object on disk. Each write rewrites the whole
//! file, so state survives between invocations the way a browser's local
//! storage survives reloads.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bazaar_core::{KeyValueStore, StoreError};
use tokio::sync::Mutex;

/// [`KeyValueStore`] over a JSON file. Clones share the same file lock.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry. A missing or unreadable file reads as empty.
    async fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StoreError::Backend(e.to_string())),
        };

        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Ignoring malformed store file"
            );
            BTreeMap::new()
        }))
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        if entries.remove(key).is_some() {
            self.write_all(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::{CartRepository, FavoritesLedger, ProductId};

    use super::*;

    fn temp_store() -> FileStore {
        let path = std::env::temp_dir().join(format!("bazaar-store-{}.json", uuid::Uuid::new_v4()));
        FileStore::new(path)
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let store = temp_store();
        assert_eq!(store.get("cart").await.unwrap(), None);
        assert!(store.load_cart().await.unwrap().is_empty());
        store.remove("cart").await.unwrap();
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let first = temp_store();
        FavoritesLedger::new(&first)
            .toggle(ProductId::new(3))
            .await
            .unwrap();

        let reopened = FileStore::new(first.path());
        let favorites = FavoritesLedger::new(&reopened).load().await.unwrap();
        assert!(favorites.contains(ProductId::new(3)));

        tokio::fs::remove_file(first.path()).await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_file_reads_empty() {
        let store = temp_store();
        tokio::fs::write(store.path(), "not json").await.unwrap();
        assert_eq!(store.get("favorites").await.unwrap(), None);

        store.set("favorites", "[1]".to_string()).await.unwrap();
        assert_eq!(store.get("favorites").await.unwrap().as_deref(), Some("[1]"));

        tokio::fs::remove_file(store.path()).await.unwrap();
    }
}
