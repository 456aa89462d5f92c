//! Embedded on-disk storage backed by `redb`.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, TableDefinition};

use super::{KeyValueStore, StorageError};

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// A [`KeyValueStore`] backed by a `redb` database file.
///
/// Every write commits in its own transaction, so a crash never leaves a
/// half-applied batch.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a database at the given path, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if the directory or database cannot
    /// be created.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(StorageError::backend)?;
        }

        let db = Database::create(path).map_err(StorageError::backend)?;

        // Ensure the table exists so first reads don't fail.
        let write_txn = db.begin_write().map_err(StorageError::backend)?;
        {
            let _table = write_txn.open_table(TABLE).map_err(StorageError::backend)?;
        }
        write_txn.commit().map_err(StorageError::backend)?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let read_txn = self.db.begin_read().map_err(StorageError::backend)?;
        let table = read_txn.open_table(TABLE).map_err(StorageError::backend)?;

        match table.get(key) {
            Ok(Some(value)) => Ok(Some(value.value().to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(StorageError::backend(e)),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.batch_set(&[(key, value)])
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.batch_delete(&[key])
    }

    fn batch_set(&self, entries: &[(&str, &[u8])]) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write().map_err(StorageError::backend)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(StorageError::backend)?;
            for (key, value) in entries {
                table.insert(*key, *value).map_err(StorageError::backend)?;
            }
        }
        write_txn.commit().map_err(StorageError::backend)?;
        Ok(())
    }

    fn batch_delete(&self, keys: &[&str]) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write().map_err(StorageError::backend)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(StorageError::backend)?;
            for key in keys {
                table.remove(*key).map_err(StorageError::backend)?;
            }
        }
        write_txn.commit().map_err(StorageError::backend)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::keys;

    #[test]
    fn test_set_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("test.redb")).unwrap();

        assert_eq!(store.get("missing").unwrap(), None);

        store.set("k", b"v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"v".to_vec()));

        store.delete("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);

        // Deleting an absent key is fine.
        store.delete("k").unwrap();
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.redb");

        {
            let store = RedbStore::open(&path).unwrap();
            store.set(keys::SESSION_TOKENS, b"{\"token\":true}").unwrap();
        }

        let store = RedbStore::open(&path).unwrap();
        assert_eq!(
            store.get(keys::SESSION_TOKENS).unwrap(),
            Some(b"{\"token\":true}".to_vec())
        );
    }

    #[test]
    fn test_batch_delete_clears_all_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("test.redb")).unwrap();

        store
            .batch_set(&[(keys::SESSION_TOKENS, b"t" as &[u8]), (keys::USER_RECORD, b"u")])
            .unwrap();

        store
            .batch_delete(&[keys::SESSION_TOKENS, keys::USER_RECORD])
            .unwrap();

        assert_eq!(store.get(keys::SESSION_TOKENS).unwrap(), None);
        assert_eq!(store.get(keys::USER_RECORD).unwrap(), None);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("state").join("nested").join("db.redb");
        let store = RedbStore::open(&nested).unwrap();
        store.set("k", b"v").unwrap();
        assert!(nested.exists());
    }
}
