//! Key-value storage backends for the signature cache.
//!
//! The cache itself only needs put/get/delete/clear over byte values; this
//! trait keeps the persistence choice pluggable (embedded redb file for
//! real runs, an in-memory map for tests and ephemeral scans).

use std::collections::HashMap;
use std::sync::RwLock;

use crate::CacheError;

/// Trait for a key-value storage backend for the signature cache.
pub trait CacheBackend: Send + Sync {
    /// Insert or update a key-value pair.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;
    /// Retrieve a value by key.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;
    /// Delete a key-value pair. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;
    /// Insert or update multiple key-value pairs in a batch.
    fn batch_put(&self, entries: Vec<(String, Vec<u8>)>) -> Result<(), CacheError>;
    /// Remove every entry.
    fn clear(&self) -> Result<(), CacheError>;
}

/// Configuration for selecting and building a backend.
#[derive(Clone, Debug, Default)]
pub enum BackendConfig {
    /// Use redb for storage; `path` is the database file path.
    ///
    /// Requires the `backend-redb` feature (enabled by default).
    #[cfg(feature = "backend-redb")]
    Redb { path: String },
    /// Use an in-memory HashMap. Useful for testing; nothing survives the
    /// process.
    #[default]
    InMemory,
}

impl BackendConfig {
    /// Create an in-memory backend configuration.
    pub fn in_memory() -> Self {
        BackendConfig::InMemory
    }

    /// Create a redb backend configuration.
    #[cfg(feature = "backend-redb")]
    pub fn redb<P: Into<String>>(path: P) -> Self {
        BackendConfig::Redb { path: path.into() }
    }

    /// Build the backend described by this configuration.
    pub fn build(&self) -> Result<Box<dyn CacheBackend>, CacheError> {
        match self {
            #[cfg(feature = "backend-redb")]
            BackendConfig::Redb { path } => Ok(Box::new(crate::redb_backend::RedbBackend::open(
                path,
            )?)),
            BackendConfig::InMemory => Ok(Box::new(InMemoryBackend::new())),
        }
    }
}

/// HashMap-backed backend for tests and ephemeral scans.
pub struct InMemoryBackend {
    map: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheBackend for InMemoryBackend {
    fn put(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let mut map = self.map.write().map_err(|_| CacheError::poisoned())?;
        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let map = self.map.read().map_err(|_| CacheError::poisoned())?;
        Ok(map.get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut map = self.map.write().map_err(|_| CacheError::poisoned())?;
        map.remove(key);
        Ok(())
    }

    fn batch_put(&self, entries: Vec<(String, Vec<u8>)>) -> Result<(), CacheError> {
        let mut map = self.map.write().map_err(|_| CacheError::poisoned())?;
        for (key, value) in entries {
            map.insert(key, value);
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        let mut map = self.map.write().map_err(|_| CacheError::poisoned())?;
        map.clear();
        Ok(())
    }
}
