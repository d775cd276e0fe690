use perceptual::{PerceptualConfig, PerceptualError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::source::SourceError;

/// Configuration for a duplicate scan.
///
/// `ScanConfig` is cheap to clone and serde-friendly so it can be loaded
/// from settings files or embedded in higher-level configs. One config
/// governs one scan; in particular `num_hashes` fixes the signature length
/// for every document compared within that scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// Minimum estimated similarity for a near-duplicate pair, in [0, 1].
    #[serde(default = "ScanConfig::default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// Word tokens per shingle.
    #[serde(default = "ScanConfig::default_shingle_size")]
    pub shingle_size: usize,
    /// MinHash signature length.
    #[serde(default = "ScanConfig::default_num_hashes")]
    pub num_hashes: usize,
    /// Documents whose canonical content is shorter than this many
    /// characters are excluded before signature computation.
    #[serde(default = "ScanConfig::default_min_content_len")]
    pub min_content_len: usize,
    /// Folder prefixes to skip when enumerating documents.
    #[serde(default)]
    pub exclude_folders: Vec<String>,
    /// Regex patterns over document paths to skip. Invalid patterns are
    /// logged and ignored; the scan continues.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    /// Corpus-frequency filter threshold in (0, 1); `None` disables the
    /// filter. When enabled, the signature cache is bypassed because
    /// filtered signatures depend on corpus-wide state that per-file
    /// mtimes cannot invalidate.
    #[serde(default)]
    pub filter_threshold: Option<f64>,
    /// Seed for deterministic MinHash coefficients. Without one, fuzzy
    /// results vary run to run; exact-duplicate results are always stable.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Consult and update the signature cache when one is attached.
    #[serde(default = "ScanConfig::default_cache_enabled")]
    pub cache_enabled: bool,
}

impl ScanConfig {
    pub(crate) fn default_similarity_threshold() -> f64 {
        0.7
    }

    pub(crate) fn default_shingle_size() -> usize {
        3
    }

    pub(crate) fn default_num_hashes() -> usize {
        128
    }

    pub(crate) fn default_min_content_len() -> usize {
        50
    }

    pub(crate) fn default_cache_enabled() -> bool {
        true
    }

    /// Create a configuration with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the similarity threshold.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set the shingle size.
    pub fn with_shingle_size(mut self, shingle_size: usize) -> Self {
        self.shingle_size = shingle_size;
        self
    }

    /// Set the signature length.
    pub fn with_num_hashes(mut self, num_hashes: usize) -> Self {
        self.num_hashes = num_hashes;
        self
    }

    /// Set the minimum canonical content length.
    pub fn with_min_content_len(mut self, min_content_len: usize) -> Self {
        self.min_content_len = min_content_len;
        self
    }

    /// Enable the corpus-frequency filter.
    pub fn with_filter_threshold(mut self, threshold: f64) -> Self {
        self.filter_threshold = Some(threshold);
        self
    }

    /// Set a fixed seed for reproducible fuzzy results.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable cache usage.
    pub fn with_cache_enabled(mut self, cache_enabled: bool) -> Self {
        self.cache_enabled = cache_enabled;
        self
    }

    /// The perceptual configuration implied by this scan configuration.
    pub fn perceptual_config(&self) -> PerceptualConfig {
        PerceptualConfig {
            shingle_size: self.shingle_size,
            num_hashes: self.num_hashes,
            seed: self.seed,
            ..PerceptualConfig::default()
        }
    }

    /// Validate the configuration before a scan.
    pub fn validate(&self) -> Result<(), ScanError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ScanError::InvalidConfig(format!(
                "similarity_threshold must be within [0, 1] (got {})",
                self.similarity_threshold
            )));
        }
        if self.shingle_size < 1 {
            return Err(ScanError::InvalidConfig(
                "shingle_size must be >= 1".into(),
            ));
        }
        if self.num_hashes < 1 {
            return Err(ScanError::InvalidConfig("num_hashes must be >= 1".into()));
        }
        if let Some(threshold) = self.filter_threshold {
            if !(threshold > 0.0 && threshold < 1.0) {
                return Err(ScanError::InvalidConfig(format!(
                    "filter_threshold must be within (0, 1) (got {threshold})"
                )));
            }
        }
        Ok(())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: Self::default_similarity_threshold(),
            shingle_size: Self::default_shingle_size(),
            num_hashes: Self::default_num_hashes(),
            min_content_len: Self::default_min_content_len(),
            exclude_folders: Vec::new(),
            exclude_patterns: Vec::new(),
            filter_threshold: None,
            seed: None,
            cache_enabled: Self::default_cache_enabled(),
        }
    }
}

/// How a duplicate pair was detected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    /// Canonical content digests are equal.
    Exact,
    /// MinHash similarity estimate met the threshold.
    Minhash,
}

/// File metadata recorded for both sides of a pair, for presentation and
/// keep/delete decisions downstream.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PairMetadata {
    pub created_a: i64,
    pub created_b: i64,
    pub modified_a: i64,
    pub modified_b: i64,
    pub size_a: u64,
    pub size_b: u64,
    /// Canonical-content line counts, taken from the signatures.
    pub lines_a: usize,
    pub lines_b: usize,
}

/// One detected duplicate pair.
///
/// Exactly one pair exists per unordered path pair per scan; exact pairs
/// are never re-emitted as minhash pairs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DuplicatePair {
    /// Deterministic, order-independent key: the two paths joined in
    /// lexicographic order.
    pub id: String,
    pub path_a: String,
    pub path_b: String,
    /// Similarity in [0, 1]; 1.0 for exact pairs.
    pub similarity: f64,
    pub method: DetectionMethod,
    pub metadata: PairMetadata,
}

/// Phase tag for progress events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScanPhase {
    Reading,
    Hashing,
    Comparing,
    Complete,
    Cancelled,
}

/// A progress event. `current` never exceeds `total`; a terminal event
/// (`Complete` or `Cancelled`) is always delivered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanProgress {
    pub phase: ScanPhase,
    pub current: usize,
    pub total: usize,
    /// Path of the document currently being processed, when applicable.
    pub current_path: Option<String>,
}

/// Summary of one completed or cancelled scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanResult {
    /// Duplicate pairs ranked by similarity, descending. Empty when the
    /// scan was cancelled.
    pub duplicates: Vec<DuplicatePair>,
    /// Documents whose signatures entered the comparison phase.
    pub scanned_count: usize,
    /// Documents skipped (unreadable, too short, or metadata missing).
    pub skipped_count: usize,
    /// Wall-clock duration of the scan.
    pub duration_ms: u64,
    /// Completion time, epoch milliseconds.
    pub timestamp: i64,
    /// Whether the scan terminated through cancellation.
    pub cancelled: bool,
}

/// Errors produced by the scan layer.
///
/// Per-document failures (unreadable files, vanished metadata) are not
/// errors: they increment `skipped_count` and the scan continues. These
/// variants cover whole-scan failures only.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Invalid scan configuration.
    #[error("invalid scan config: {0}")]
    InvalidConfig(String),
    /// Document enumeration failed; nothing to scan.
    #[error("document source error: {0}")]
    Source(#[from] SourceError),
    /// Signature computation or comparison failed. A length mismatch here
    /// means signatures from incompatible configurations were mixed.
    #[error("perceptual error: {0}")]
    Perceptual(#[from] PerceptualError),
}
