//! # dupscan perceptual fingerprinting
//!
//! This crate turns canonical document text into compact, similarity-
//! preserving MinHash signatures that are robust to minor content edits.
//!
//! ## Contract
//!
//! - The perceptual layer only consumes canonical content produced by the
//!   upstream normalization crate; it never does I/O.
//! - For the same content and the same seeded [`PerceptualConfig`], the
//!   output is bit identical on any machine.
//!
//! ## Core Pipeline
//!
//! 1. **Shingling**: the content is tokenized into lowercase alphanumeric
//!    words and converted into a set of overlapping k-word shingles.
//! 2. **Corpus filtering** (optional): shingles that occur in more than a
//!    configured fraction of the corpus are dropped, so boilerplate shared
//!    by many documents does not inflate similarity.
//! 3. **MinHashing**: the shingle set is reduced to a fixed-length vector
//!    of 32-bit minima under a family of universal hash functions. The
//!    fraction of positions where two signatures agree estimates the
//!    Jaccard similarity of the underlying shingle sets.
//!
//! ## Example Usage
//!
//! ```
//! use perceptual::{estimate_similarity, shingle, MinHasher, PerceptualConfig};
//!
//! let cfg = PerceptualConfig::new().with_seed(42);
//! let engine = MinHasher::new(&cfg).unwrap();
//!
//! let a = engine.compute(&shingle("the quick brown fox jumps over the lazy dog", 3));
//! let b = engine.compute(&shingle("the quick brown fox leaps over the lazy dog", 3));
//!
//! let similarity = estimate_similarity(&a, &b).unwrap();
//! assert!(similarity > 0.0 && similarity < 1.0);
//! ```

pub mod config;
pub mod filter;
pub mod minhash;
pub mod shingles;

pub use crate::config::{PerceptualConfig, PerceptualError};
pub use crate::filter::{CorpusFilter, FilterStats};
pub use crate::minhash::{
    estimate_similarity, generate_coefficients, HashPair, MinHasher, EMPTY_SLOT,
};
pub use crate::shingles::{shingle, ShingleSet};
