//! Configuration and error types for dupscan perceptual fingerprinting.
//!
//! This module defines the public configuration surface for the perceptual
//! layer. It is intentionally free of any I/O or environment-dependent
//! behavior so that signature computation is a pure function of
//! `(shingle_set, config)` — except for the explicitly non-deterministic
//! unseeded coefficient mode.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for the perceptual fingerprinting pipeline.
///
/// All documents compared within one scan must share one configuration;
/// signatures produced under different `num_hashes` values are not
/// comparable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerceptualConfig {
    /// Configuration schema version.
    ///
    /// Any algorithmic change that can affect signatures must bump this
    /// version, so that old cached signatures remain replayable.
    pub version: u32,
    /// Number of word tokens per shingle (k-shingling).
    ///
    /// Larger values are more robust to noise but less tolerant to
    /// reordering.
    pub shingle_size: usize,
    /// Number of MinHash functions, i.e. the signature length.
    ///
    /// More hashes tighten the Jaccard estimate at the cost of memory and
    /// per-pair comparison time.
    pub num_hashes: usize,
    /// Optional seed for deterministic coefficient generation.
    ///
    /// With a seed, two runs produce bit-identical signatures for the same
    /// shingle sets. Without one, coefficients are drawn fresh each run and
    /// only exact-duplicate results are stable across runs.
    pub seed: Option<u64>,
    /// Enable parallel signature computation via rayon.
    pub use_parallel: bool,
}

impl PerceptualConfig {
    /// Create a new configuration with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shingle size. Typical values: 2-5.
    pub fn with_shingle_size(mut self, shingle_size: usize) -> Self {
        self.shingle_size = shingle_size;
        self
    }

    /// Set the signature length. Typical values: 64-256.
    pub fn with_num_hashes(mut self, num_hashes: usize) -> Self {
        self.num_hashes = num_hashes;
        self
    }

    /// Set a fixed seed for reproducible signatures.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), PerceptualError> {
        if self.shingle_size < 1 {
            return Err(PerceptualError::InvalidConfigShingleSize {
                shingle_size: self.shingle_size,
            });
        }
        if self.num_hashes < 1 {
            return Err(PerceptualError::InvalidConfigNumHashes {
                num_hashes: self.num_hashes,
            });
        }
        if self.version < 1 {
            return Err(PerceptualError::InvalidConfigVersion {
                version: self.version,
            });
        }
        Ok(())
    }
}

impl Default for PerceptualConfig {
    fn default() -> Self {
        Self {
            version: 1,
            shingle_size: 3,
            num_hashes: 128,
            seed: None,
            use_parallel: false,
        }
    }
}

/// Errors returned by the perceptual fingerprinting pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PerceptualError {
    #[error("invalid config: shingle_size must be >= 1 (got {shingle_size})")]
    InvalidConfigShingleSize { shingle_size: usize },

    #[error("invalid config: num_hashes must be >= 1 (got {num_hashes})")]
    InvalidConfigNumHashes { num_hashes: usize },

    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },

    #[error("signature length mismatch: {left} vs {right}")]
    SignatureLengthMismatch { left: usize, right: usize },

    #[error("invalid filter threshold {threshold}; expected exclusive range (0, 1)")]
    InvalidFilterThreshold { threshold: f64 },
}
