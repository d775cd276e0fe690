//! Scan orchestration.
//!
//! [`Scanner`] drives the full pipeline: enumerate documents, apply
//! exclusion rules, read and canonicalize content, compute signatures
//! (through the cache when one is attached), then hand the signature set
//! to the comparator and rank the resulting pairs.
//!
//! Per-document failures never abort a scan. An unreadable file, vanished
//! metadata, or content below the minimum length increments
//! `skipped_count` and the scan moves on; only enumeration failures and
//! invalid configuration are whole-scan errors.

use std::collections::BTreeMap;
use std::time::Instant;

use regex::Regex;
use sigcache::{DocumentSignature, SignatureCache};

use canonical::{content_digest, count_lines, normalize};
use perceptual::{shingle, CorpusFilter, MinHasher, ShingleSet};

use crate::cancel::CancelToken;
use crate::comparator::find_duplicates;
use crate::source::DocumentSource;
use crate::types::{ScanConfig, ScanError, ScanPhase, ScanProgress, ScanResult};

/// Progress callback type alias for readability at call sites.
pub type ProgressFn<'a> = &'a dyn Fn(ScanProgress);

/// Duplicate scan driver.
pub struct Scanner {
    config: ScanConfig,
    cache: Option<SignatureCache>,
}

impl Scanner {
    /// Create a scanner with a validated configuration and no cache.
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        config.validate()?;
        Ok(Self {
            config,
            cache: None,
        })
    }

    /// Attach a signature cache. The cache is consulted only when the
    /// configuration enables it and the corpus filter is off.
    pub fn with_cache(mut self, cache: SignatureCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Run a full scan over `source`.
    ///
    /// Cancellation at any point yields a normal result with an empty
    /// duplicate list; document counts and timing are still reported.
    pub fn scan(
        &self,
        source: &dyn DocumentSource,
        cancel: &CancelToken,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<ScanResult, ScanError> {
        let started = Instant::now();
        let hasher = MinHasher::new(&self.config.perceptual_config())?;
        let patterns = self.compile_exclude_patterns();

        let mut paths: Vec<String> = source
            .list()?
            .into_iter()
            .filter(|path| !self.is_excluded(path, &patterns))
            .collect();
        paths.sort();

        report(on_progress, ScanPhase::Reading, 0, paths.len(), None);

        let (signatures, skipped_count) = match self.config.filter_threshold {
            Some(threshold) => {
                self.hash_with_filter(source, &hasher, &paths, threshold, cancel, on_progress)?
            }
            None => self.hash_with_cache(source, &hasher, &paths, cancel, on_progress)?,
        };
        let scanned_count = signatures.len();

        report(on_progress, ScanPhase::Comparing, 0, scanned_count, None);

        let mut duplicates = find_duplicates(
            &signatures,
            source,
            self.config.similarity_threshold,
            cancel,
            on_progress,
        )?;

        let cancelled = cancel.is_cancelled();
        if cancelled {
            duplicates.clear();
        } else {
            // Rank by similarity, strongest first; ties broken by pair id
            // so result order is deterministic.
            duplicates.sort_by(|a, b| {
                b.similarity
                    .total_cmp(&a.similarity)
                    .then_with(|| a.id.cmp(&b.id))
            });
        }

        let terminal = if cancelled {
            ScanPhase::Cancelled
        } else {
            ScanPhase::Complete
        };
        report(on_progress, terminal, scanned_count, scanned_count, None);

        Ok(ScanResult {
            duplicates,
            scanned_count,
            skipped_count,
            duration_ms: started.elapsed().as_millis() as u64,
            timestamp: chrono::Utc::now().timestamp_millis(),
            cancelled,
        })
    }

    /// Signature computation with cache acceleration. Fresh cache entries
    /// short-circuit the read/normalize/hash path entirely.
    fn hash_with_cache(
        &self,
        source: &dyn DocumentSource,
        hasher: &MinHasher,
        paths: &[String],
        cancel: &CancelToken,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<(BTreeMap<String, DocumentSignature>, usize), ScanError> {
        let cache = if self.config.cache_enabled {
            self.cache.as_ref()
        } else {
            None
        };
        let mut signatures = BTreeMap::new();
        let mut fresh: Vec<DocumentSignature> = Vec::new();
        let mut skipped = 0usize;

        for (idx, path) in paths.iter().enumerate() {
            if cancel.is_cancelled() {
                break;
            }
            report(
                on_progress,
                ScanPhase::Hashing,
                idx,
                paths.len(),
                Some(path.clone()),
            );

            let meta = match source.metadata(path) {
                Ok(meta) => meta,
                Err(err) => {
                    tracing::debug!(%path, %err, "skipping document, metadata unavailable");
                    skipped += 1;
                    continue;
                }
            };

            if let Some(cache) = cache {
                match cache.get_if_fresh(path, meta.modified) {
                    Ok(Some(sig)) => {
                        signatures.insert(path.clone(), sig);
                        continue;
                    }
                    Ok(None) => {}
                    Err(err) => {
                        // A failing cache degrades to a full recompute.
                        tracing::warn!(%path, %err, "cache read failed, recomputing");
                    }
                }
            }

            let raw = match source.read(path) {
                Ok(raw) => raw,
                Err(err) => {
                    tracing::debug!(%path, %err, "skipping document, unreadable");
                    skipped += 1;
                    continue;
                }
            };
            let content = normalize(&raw);
            if content.chars().count() < self.config.min_content_len {
                skipped += 1;
                continue;
            }

            let shingles = shingle(&content, self.config.shingle_size);
            let sig = DocumentSignature {
                path: path.clone(),
                mtime: meta.modified,
                content_hash: content_digest(&content),
                line_count: count_lines(&content),
                minhash: hasher.compute(&shingles),
            };
            fresh.push(sig.clone());
            signatures.insert(path.clone(), sig);
        }

        if let Some(cache) = cache {
            if let Err(err) = cache.set_many(&fresh) {
                tracing::warn!(%err, "cache write failed, signatures not persisted");
            }
        }

        Ok((signatures, skipped))
    }

    /// Two-pass signature computation with the corpus-frequency filter.
    ///
    /// Pass one reads and shingles every document so the filter observes
    /// the whole corpus, short documents included. Pass two applies the
    /// length cutoff, filters each shingle set, and hashes it. Filtered
    /// signatures depend on corpus-wide state, so the cache is bypassed.
    fn hash_with_filter(
        &self,
        source: &dyn DocumentSource,
        hasher: &MinHasher,
        paths: &[String],
        threshold: f64,
        cancel: &CancelToken,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<(BTreeMap<String, DocumentSignature>, usize), ScanError> {
        let mut filter = CorpusFilter::new(threshold)?;
        let mut prepared: Vec<(String, i64, String, ShingleSet)> = Vec::new();
        let mut skipped = 0usize;

        for (idx, path) in paths.iter().enumerate() {
            if cancel.is_cancelled() {
                break;
            }
            report(
                on_progress,
                ScanPhase::Hashing,
                idx,
                paths.len(),
                Some(path.clone()),
            );

            let meta = match source.metadata(path) {
                Ok(meta) => meta,
                Err(err) => {
                    tracing::debug!(%path, %err, "skipping document, metadata unavailable");
                    skipped += 1;
                    continue;
                }
            };
            let raw = match source.read(path) {
                Ok(raw) => raw,
                Err(err) => {
                    tracing::debug!(%path, %err, "skipping document, unreadable");
                    skipped += 1;
                    continue;
                }
            };
            let content = normalize(&raw);
            let shingles = shingle(&content, self.config.shingle_size);
            filter.observe(&shingles);
            prepared.push((path.clone(), meta.modified, content, shingles));
        }

        let stats = filter.stats();
        tracing::debug!(
            total_shingles = stats.total_shingles,
            filtered_shingles = stats.filtered_shingles,
            total_documents = stats.total_documents,
            "corpus filter built"
        );

        let mut signatures = BTreeMap::new();
        for (path, mtime, content, shingles) in prepared {
            if cancel.is_cancelled() {
                break;
            }
            if content.chars().count() < self.config.min_content_len {
                skipped += 1;
                continue;
            }
            let filtered = filter.filter(&shingles);
            let sig = DocumentSignature {
                path: path.clone(),
                mtime,
                content_hash: content_digest(&content),
                line_count: count_lines(&content),
                minhash: hasher.compute(&filtered),
            };
            signatures.insert(path, sig);
        }

        Ok((signatures, skipped))
    }

    fn compile_exclude_patterns(&self) -> Vec<Regex> {
        self.config
            .exclude_patterns
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    tracing::warn!(%pattern, %err, "ignoring invalid exclude pattern");
                    None
                }
            })
            .collect()
    }

    fn is_excluded(&self, path: &str, patterns: &[Regex]) -> bool {
        for folder in &self.config.exclude_folders {
            let folder = folder.trim_end_matches('/');
            if folder.is_empty() {
                continue;
            }
            if let Some(rest) = path.strip_prefix(folder) {
                if rest.is_empty() || rest.starts_with('/') {
                    return true;
                }
            }
        }
        patterns.iter().any(|regex| regex.is_match(path))
    }
}

fn report(
    on_progress: Option<ProgressFn<'_>>,
    phase: ScanPhase,
    current: usize,
    total: usize,
    current_path: Option<String>,
) {
    if let Some(progress) = on_progress {
        progress(ScanProgress {
            phase,
            current,
            total,
            current_path,
        });
    }
}
