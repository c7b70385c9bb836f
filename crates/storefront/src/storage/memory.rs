//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{CartStorage, StorageError};

/// Storage that lives as long as the process.
///
/// Used by tests and by embedders that handle durability themselves.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one slot.
    #[must_use]
    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        storage
    }
}

impl CartStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_is_none() {
        let storage = MemoryStorage::new();
        assert!(storage.get_item("@RocketShoes:cart").unwrap().is_none());
    }

    #[test]
    fn test_set_overwrites() {
        let storage = MemoryStorage::with_item("k", "[]");
        storage.set_item("k", "[1]").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("[1]"));
    }
}
