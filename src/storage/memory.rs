//! In-memory key-value storage for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{CartStorage, StorageError};

/// HashMap-backed store. Cloning shares the underlying map, so a test can
/// hand one clone to the cart store and inspect another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl CartStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let storage = MemoryStorage::new();
        storage.set("k", b"value".to_vec()).await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), Some(b"value".to_vec()));
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let storage = MemoryStorage::new();
        let view = storage.clone();
        storage.set("k", b"v".to_vec()).await.unwrap();
        assert_eq!(view.len(), 1);
    }
}
