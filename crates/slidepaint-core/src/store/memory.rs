//! In-memory slide store.

use super::{BoxFuture, SlideStore, StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store for testing and embedding.
#[derive(Default)]
pub struct MemorySlideStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySlideStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the text stored under `key`.
    pub fn insert(&self, key: impl Into<String>, text: impl Into<String>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.into(), text.into());
        }
    }

    /// Remove the entry stored under `key`.
    pub fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for MemorySlideStore
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl SlideStore for MemorySlideStore {
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<String>>> {
        Box::pin(async move {
            let entries = self
                .entries
                .read()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            Ok(entries.keys().cloned().collect())
        })
    }

    fn read(&self, key: &str) -> BoxFuture<'_, StoreResult<String>> {
        let key = key.to_string();
        Box::pin(async move {
            let entries = self
                .entries
                .read()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            entries
                .get(&key)
                .cloned()
                .ok_or_else(|| StoreError::NotFound(key))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_read() {
        let store = MemorySlideStore::new();
        store.insert("/slides/slide-1.json", "{}");
        let text = pollster::block_on(store.read("/slides/slide-1.json")).unwrap();
        assert_eq!(text, "{}");
    }

    #[test]
    fn test_not_found() {
        let store = MemorySlideStore::new();
        let result = pollster::block_on(store.read("/slides/slide-9.json"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_list_and_remove() {
        let store: MemorySlideStore = [("a", "1"), ("b", "2")].into_iter().collect();
        store.remove("a");
        let keys = pollster::block_on(store.list()).unwrap();
        assert_eq!(keys, vec!["b".to_string()]);
    }
}
