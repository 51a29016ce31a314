//! In-memory named-blob storage, for tests and dry runs

use std::cell::RefCell;
use std::collections::HashMap;

use fuellog_domain::repository::LogStorage;
use fuellog_types::Result;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `blob` already stored under `key`
    pub fn with_blob(key: &str, blob: &str) -> Self {
        let storage = Self::default();
        storage
            .blobs
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        storage
    }
}

impl LogStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.blobs.borrow_mut().remove(key);
        Ok(())
    }
}
