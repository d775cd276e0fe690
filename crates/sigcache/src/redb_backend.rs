//! Redb backend for the signature cache.
//!
//! Redb is a pure Rust embedded key-value store with ACID transactions, so
//! the cache file stays consistent even if a scan is interrupted mid-write.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::backend::CacheBackend;
use crate::CacheError;

/// Table holding serialized signatures keyed by document path.
const SIGNATURE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("signatures");

/// Redb-backed persistence for cached signatures.
///
/// The `Arc<Database>` wrapper allows safe sharing across threads; redb
/// handles its own internal locking and MVCC.
pub struct RedbBackend {
    db: Arc<Database>,
}

impl RedbBackend {
    /// Open or create a redb database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CacheError> {
        let db = Database::create(path).map_err(|e| CacheError::backend(e.to_string()))?;

        // Opening the table once up front creates it if missing.
        let write_txn = db
            .begin_write()
            .map_err(|e| CacheError::backend(e.to_string()))?;
        {
            let _table = write_txn
                .open_table(SIGNATURE_TABLE)
                .map_err(|e| CacheError::backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| CacheError::backend(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl CacheBackend for RedbBackend {
    fn put(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.batch_put(vec![(key.to_string(), value.to_vec())])
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| CacheError::backend(e.to_string()))?;
        let table = read_txn
            .open_table(SIGNATURE_TABLE)
            .map_err(|e| CacheError::backend(e.to_string()))?;

        match table
            .get(key)
            .map_err(|e| CacheError::backend(e.to_string()))?
        {
            Some(value) => Ok(Some(value.value().to_vec())),
            None => Ok(None),
        }
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| CacheError::backend(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(SIGNATURE_TABLE)
                .map_err(|e| CacheError::backend(e.to_string()))?;
            table
                .remove(key)
                .map_err(|e| CacheError::backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| CacheError::backend(e.to_string()))?;
        Ok(())
    }

    fn batch_put(&self, entries: Vec<(String, Vec<u8>)>) -> Result<(), CacheError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| CacheError::backend(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(SIGNATURE_TABLE)
                .map_err(|e| CacheError::backend(e.to_string()))?;
            for (key, value) in &entries {
                table
                    .insert(key.as_str(), value.as_slice())
                    .map_err(|e| CacheError::backend(e.to_string()))?;
            }
        }
        write_txn
            .commit()
            .map_err(|e| CacheError::backend(e.to_string()))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| CacheError::backend(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(SIGNATURE_TABLE)
                .map_err(|e| CacheError::backend(e.to_string()))?;
            let keys: Vec<String> = table
                .iter()
                .map_err(|e| CacheError::backend(e.to_string()))?
                .map(|entry| {
                    entry
                        .map(|(k, _)| k.value().to_string())
                        .map_err(|e| CacheError::backend(e.to_string()))
                })
                .collect::<Result<_, _>>()?;
            for key in keys {
                table
                    .remove(key.as_str())
                    .map_err(|e| CacheError::backend(e.to_string()))?;
            }
        }
        write_txn
            .commit()
            .map_err(|e| CacheError::backend(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redb_roundtrip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.redb");

        {
            let backend = RedbBackend::open(&path).unwrap();
            backend.put("notes/a.md", b"payload").unwrap();
        }

        let backend = RedbBackend::open(&path).unwrap();
        assert_eq!(
            backend.get("notes/a.md").unwrap(),
            Some(b"payload".to_vec())
        );
    }

    #[test]
    fn redb_delete_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let backend = RedbBackend::open(dir.path().join("cache.redb")).unwrap();

        backend
            .batch_put(vec![
                ("a".into(), b"1".to_vec()),
                ("b".into(), b"2".to_vec()),
                ("c".into(), b"3".to_vec()),
            ])
            .unwrap();

        backend.delete("a").unwrap();
        assert_eq!(backend.get("a").unwrap(), None);
        assert!(backend.get("b").unwrap().is_some());

        backend.clear().unwrap();
        assert_eq!(backend.get("b").unwrap(), None);
        assert_eq!(backend.get("c").unwrap(), None);
    }
}
