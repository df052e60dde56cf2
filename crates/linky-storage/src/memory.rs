use async_trait::async_trait;
use dashmap::DashMap;
use linky_core::{KvPage, KvStore, Result};
use std::sync::Arc;

/// In-memory implementation of [`KvStore`] using DashMap.
///
/// Clones share the same underlying map. Listing pages through keys in
/// lexicographic order and uses the last key of a page as the cursor, so
/// keys written during a listing may or may not be observed.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKv {
    storage: Arc<DashMap<String, String>>,
}

impl InMemoryKv {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Arc::new(DashMap::with_capacity(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl KvStore for InMemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.storage.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        self.storage.insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.storage.remove(key);
        Ok(())
    }

    async fn list(&self, cursor: Option<&str>, limit: usize) -> Result<KvPage> {
        let limit = limit.max(1);

        let mut keys: Vec<String> = self
            .storage
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|key| cursor.map_or(true, |after| key.as_str() > after))
            .collect();
        keys.sort_unstable();

        let cursor = if keys.len() > limit {
            keys.truncate(limit);
            keys.last().cloned()
        } else {
            None
        };

        Ok(KvPage { keys, cursor })
    }
}
