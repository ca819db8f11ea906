//! In-memory store, for tests and sessions that should leave no trace

use std::collections::BTreeMap;

use crate::{KeyValueStore, Result};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn load_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IS_LOGGED_IN;

    #[test]
    fn test_save_load_remove() {
        let mut store = MemoryStore::new();
        assert!(store.load_string(IS_LOGGED_IN).unwrap().is_none());

        store.save_string(IS_LOGGED_IN, "true").unwrap();
        assert_eq!(store.load_string(IS_LOGGED_IN).unwrap().as_deref(), Some("true"));

        store.remove(IS_LOGGED_IN).unwrap();
        store.remove(IS_LOGGED_IN).unwrap();
        assert!(store.is_empty());
    }
}
