//! Persisted key-value storage, the durable analog of browser local storage.
//!
//! The session store mirrors every mutation here (write-through); the API
//! client reads the current credentials back out per request. Two backends:
//! [`RedbStore`] for durable on-disk state and [`MemoryStore`] for tests and
//! ephemeral sessions.

mod memory;
mod redb;

pub use memory::MemoryStore;
pub use redb::RedbStore;

use thiserror::Error;

/// Errors that can occur in the key-value storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Wrap a backend failure, erasing the backend-specific error type.
    pub(crate) fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Durable key-value storage for client-side state.
///
/// Values are opaque bytes; callers own the encoding. Batch operations are
/// atomic: either every entry is applied or none is, which is what lets
/// logout clear the token pair and the user record together with no
/// intermediate state.
pub trait KeyValueStore: Send + Sync {
    /// Get the value for a key. Returns `None` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if the backend fails.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Set a key-value pair.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if the backend fails.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Delete a key. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if the backend fails.
    fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Set several key-value pairs in one atomic transaction.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if the backend fails; no entry is
    /// applied in that case.
    fn batch_set(&self, entries: &[(&str, &[u8])]) -> Result<(), StorageError>;

    /// Delete several keys in one atomic transaction.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if the backend fails; no key is
    /// removed in that case.
    fn batch_delete(&self, keys: &[&str]) -> Result<(), StorageError>;
}

/// Stable keys for the records the session store persists.
pub mod keys {
    /// Key for the serialized access/refresh token pair.
    pub const SESSION_TOKENS: &str = "session:tokens";

    /// Key for the serialized user record.
    pub const USER_RECORD: &str = "session:user";
}
