//! Workspace umbrella crate for dupscan.
//!
//! Stitches together canonicalization, perceptual fingerprinting, the
//! signature cache, and the scan layer, and adds the filesystem document
//! source so callers can run a full duplicate scan over a directory with
//! a single API entry point.
//!
//! ```no_run
//! use dupscan::{CancelToken, FsDocumentSource, ScanConfig, Scanner};
//!
//! # fn run() -> Result<(), dupscan::ScanError> {
//! let source = FsDocumentSource::new("/path/to/notes");
//! let scanner = Scanner::new(ScanConfig::new().with_similarity_threshold(0.8))?;
//! let result = scanner.scan(&source, &CancelToken::new(), None)?;
//! for pair in &result.duplicates {
//!     println!("{:.2}  {}  {}", pair.similarity, pair.path_a, pair.path_b);
//! }
//! # Ok(())
//! # }
//! ```

pub mod fs_source;

pub use canonical::{content_digest, count_lines, normalize};
pub use perceptual::{
    estimate_similarity, shingle, CorpusFilter, FilterStats, MinHasher, PerceptualConfig,
    PerceptualError,
};
pub use scanner::{
    CancelToken, DetectionMethod, DocumentMeta, DocumentSource, DuplicatePair, PairMetadata,
    ScanConfig, ScanError, ScanPhase, ScanProgress, ScanResult, Scanner, SourceError,
};
pub use sigcache::{BackendConfig, CacheError, DocumentSignature, SignatureCache};

pub use crate::fs_source::FsDocumentSource;
