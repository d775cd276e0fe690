//! Document source capability interface.
//!
//! The scan layer never assumes a concrete host: anything that can
//! enumerate documents, hand over their text and metadata, and trash them
//! on request can be scanned. Hosts inject an implementation of
//! [`DocumentSource`]; the filesystem source lives in the umbrella crate
//! and tests use an in-memory one.

use thiserror::Error;

/// Per-document metadata supplied by the host.
///
/// Timestamps are epoch milliseconds. The modification time is used purely
/// for cache-validity equality testing; no wall-clock meaning is assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentMeta {
    pub created: i64,
    pub modified: i64,
    /// Size in bytes of the raw document.
    pub size: u64,
}

/// Errors surfaced by a document source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("document source I/O error: {0}")]
    Io(String),
}

/// Capability interface over the host document store.
pub trait DocumentSource: Send + Sync {
    /// Enumerate every document path. Paths are unique and stable for the
    /// duration of one scan.
    fn list(&self) -> Result<Vec<String>, SourceError>;

    /// Read a document's raw text content.
    fn read(&self, path: &str) -> Result<String, SourceError>;

    /// Fetch a document's metadata.
    fn metadata(&self, path: &str) -> Result<DocumentMeta, SourceError>;

    /// Move a document to trash. Invoked by the host after a user
    /// decision, never by the scan itself.
    fn trash(&self, path: &str) -> Result<(), SourceError>;
}
