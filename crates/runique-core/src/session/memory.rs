//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::LocalError;

use super::KeyValueStore;

/// A process-local [`KeyValueStore`]. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, LocalError> {
        let entries = self.entries.read().map_err(|_| LocalError::Unknown)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LocalError> {
        let mut entries = self.entries.write().map_err(|_| LocalError::Unknown)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), LocalError> {
        let mut entries = self.entries.write().map_err(|_| LocalError::Unknown)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn removing_missing_key_is_ok() {
        let store = MemoryKeyValueStore::new();
        assert!(store.remove("missing").is_ok());
    }
}
