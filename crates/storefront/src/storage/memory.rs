//! In-memory storage for tests and ephemeral sessions.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use super::{KeyValueStore, StorageError};

/// A [`KeyValueStore`] held entirely in memory.
///
/// Nothing survives the process; use [`super::RedbStore`] for durable state.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        // A poisoned map is still structurally sound; keep serving it.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.lock().insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }

    fn batch_set(&self, entries: &[(&str, &[u8])]) -> Result<(), StorageError> {
        let mut map = self.lock();
        for (key, value) in entries {
            map.insert((*key).to_owned(), value.to_vec());
        }
        Ok(())
    }

    fn batch_delete(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut map = self.lock();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}
