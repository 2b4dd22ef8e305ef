//! In-memory run store
//!
//! Backs unit tests and the one-shot extract command, where state does not
//! need to survive the process.

use crate::storage::traits::{RunStore, StoreResult};

use std::collections::HashMap;

/// Run store backed by a plain map
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no keys are stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RunStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("phase").unwrap(), None);
    }

    #[test]
    fn test_set_and_get() {
        let mut store = MemoryStore::new();
        store.set("phase", "discovering").unwrap();
        assert_eq!(store.get("phase").unwrap().as_deref(), Some("discovering"));
    }

    #[test]
    fn test_set_replaces_value() {
        let mut store = MemoryStore::new();
        store.set("cursor", "0").unwrap();
        store.set("cursor", "1").unwrap();
        assert_eq!(store.get("cursor").unwrap().as_deref(), Some("1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = MemoryStore::new();
        store.set("cursor", "0").unwrap();
        store.remove("cursor").unwrap();
        store.remove("cursor").unwrap();
        assert!(store.is_empty());
    }
}
