//! # dupscan scan layer
//!
//! Orchestrates duplicate detection over an abstract document store:
//! enumeration and exclusion, canonicalization, signature computation
//! (cache-accelerated), pairwise comparison, and ranking. Host
//! environments supply a [`DocumentSource`]; everything above that trait
//! is host-agnostic.
//!
//! ## Example Usage
//!
//! ```
//! use scanner::demo_utils::MemorySource;
//! use scanner::{CancelToken, ScanConfig, Scanner};
//!
//! let source = MemorySource::new();
//! source.insert(
//!     "a.md",
//!     "a body long enough to clear the minimum content length threshold",
//! );
//! source.insert(
//!     "b.md",
//!     "a body long enough to clear the minimum content length threshold",
//! );
//!
//! let scanner = Scanner::new(ScanConfig::new().with_seed(7)).unwrap();
//! let result = scanner.scan(&source, &CancelToken::new(), None).unwrap();
//! assert_eq!(result.duplicates.len(), 1);
//! ```

pub mod cancel;
pub mod comparator;
#[doc(hidden)]
pub mod demo_utils;
pub mod engine;
pub mod source;
pub mod types;

pub use crate::cancel::CancelToken;
pub use crate::comparator::{find_duplicates, pair_id};
pub use crate::engine::{ProgressFn, Scanner};
pub use crate::source::{DocumentMeta, DocumentSource, SourceError};
pub use crate::types::{
    DetectionMethod, DuplicatePair, PairMetadata, ScanConfig, ScanError, ScanPhase, ScanProgress,
    ScanResult,
};
