//! # dupscan signature cache
//!
//! Persists computed document signatures across scans so unchanged files
//! are never re-hashed. Entries are keyed by document path and invalidated
//! by modification time: [`SignatureCache::get_if_fresh`] returns a stored
//! signature only when its recorded mtime equals the caller's current
//! mtime exactly — any mismatch is stale and ignored, never partially
//! reused.
//!
//! The scan layer treats this store as pure acceleration: it must operate
//! correctly (just slower) when the cache is missing or failing, so cache
//! writes are best-effort from the caller's point of view.
//!
//! ## Example Usage
//!
//! ```
//! use sigcache::{BackendConfig, DocumentSignature, SignatureCache};
//!
//! let cache = SignatureCache::open(BackendConfig::in_memory()).unwrap();
//! let sig = DocumentSignature {
//!     path: "notes/a.md".into(),
//!     mtime: 1_700_000_000_000,
//!     content_hash: "abc123".into(),
//!     line_count: 12,
//!     minhash: vec![1, 2, 3],
//! };
//! cache.set_many(std::slice::from_ref(&sig)).unwrap();
//!
//! assert_eq!(cache.get_if_fresh("notes/a.md", 1_700_000_000_000).unwrap(), Some(sig));
//! assert_eq!(cache.get_if_fresh("notes/a.md", 1_700_000_000_001).unwrap(), None);
//! ```

mod backend;
#[cfg(feature = "backend-redb")]
mod redb_backend;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::backend::{BackendConfig, CacheBackend, InMemoryBackend};
#[cfg(feature = "backend-redb")]
pub use crate::redb_backend::RedbBackend;

/// Everything a scan needs to know about a document without re-reading it.
///
/// Produced by the signature pipeline, persisted here, invalidated whenever
/// the file's modification time changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentSignature {
    /// Logical document path; unique and stable across a scan.
    pub path: String,
    /// Modification time (epoch milliseconds) the signature was computed
    /// at. Used purely for equality-based cache validity.
    pub mtime: i64,
    /// Exact content digest (SHA-256 hex) of the canonical content.
    pub content_hash: String,
    /// Line count of the canonical content.
    pub line_count: usize,
    /// MinHash signature over the document's shingle set.
    pub minhash: Vec<u32>,
}

/// Errors surfaced by the cache layer.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
    #[error("cache encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl CacheError {
    pub(crate) fn backend(msg: impl Into<String>) -> Self {
        CacheError::Backend(msg.into())
    }

    pub(crate) fn poisoned() -> Self {
        CacheError::Backend("in-memory store lock poisoned".into())
    }
}

/// Path-keyed signature store with mtime-based freshness.
pub struct SignatureCache {
    backend: Box<dyn CacheBackend>,
}

impl SignatureCache {
    /// Open a cache over the configured backend.
    pub fn open(config: BackendConfig) -> Result<Self, CacheError> {
        Ok(Self {
            backend: config.build()?,
        })
    }

    /// Wrap an existing backend.
    pub fn with_backend(backend: Box<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    /// Return the stored signature for `path` only if its recorded mtime
    /// equals `mtime` exactly; any other stored mtime means stale.
    pub fn get_if_fresh(
        &self,
        path: &str,
        mtime: i64,
    ) -> Result<Option<DocumentSignature>, CacheError> {
        match self.get(path)? {
            Some(sig) if sig.mtime == mtime => Ok(Some(sig)),
            _ => Ok(None),
        }
    }

    /// Return the stored signature regardless of freshness.
    pub fn get(&self, path: &str) -> Result<Option<DocumentSignature>, CacheError> {
        match self.backend.get(path)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Persist a batch of freshly computed signatures.
    pub fn set_many(&self, signatures: &[DocumentSignature]) -> Result<(), CacheError> {
        if signatures.is_empty() {
            return Ok(());
        }
        let entries = signatures
            .iter()
            .map(|sig| Ok((sig.path.clone(), serde_json::to_vec(sig)?)))
            .collect::<Result<Vec<_>, CacheError>>()?;
        self.backend.batch_put(entries)
    }

    /// Drop the entry for one path.
    pub fn delete(&self, path: &str) -> Result<(), CacheError> {
        self.backend.delete(path)
    }

    /// Drop every entry.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.backend.clear()
    }
}
