//! Pairwise duplicate detection over computed signatures.
//!
//! Detection runs in two phases. Exact duplicates are grouped by canonical
//! content digest and emitted at similarity 1.0 without touching the
//! MinHash signatures. The fuzzy phase then compares every remaining pair
//! of signatures and keeps those whose similarity estimate meets the
//! threshold. A pair found in the exact phase is never re-emitted by the
//! fuzzy phase.

use std::collections::{BTreeMap, HashMap, HashSet};

use perceptual::estimate_similarity;
use sigcache::DocumentSignature;

use crate::cancel::CancelToken;
use crate::source::DocumentSource;
use crate::types::{
    DetectionMethod, DuplicatePair, PairMetadata, ScanError, ScanPhase, ScanProgress,
};

/// Progress is reported once per this many outer identities during the
/// fuzzy phase, to keep callback overhead negligible on large corpora.
const PROGRESS_STRIDE: usize = 50;

/// Deterministic, order-independent pair key: both paths in lexicographic
/// order, joined by a separator.
pub fn pair_id(path_a: &str, path_b: &str) -> String {
    if path_a <= path_b {
        format!("{path_a}::{path_b}")
    } else {
        format!("{path_b}::{path_a}")
    }
}

/// Find all duplicate pairs among the given signatures.
///
/// Returns pairs in discovery order; ranking is the caller's concern.
/// Cancellation is honored between outer identities of the fuzzy phase, so
/// a cancelled call returns early with whatever remains unreported
/// dropped by the caller.
pub fn find_duplicates(
    signatures: &BTreeMap<String, DocumentSignature>,
    source: &dyn DocumentSource,
    threshold: f64,
    cancel: &CancelToken,
    on_progress: Option<&dyn Fn(ScanProgress)>,
) -> Result<Vec<DuplicatePair>, ScanError> {
    let mut pairs = Vec::new();
    let mut exact_keys: HashSet<String> = HashSet::new();

    // Phase 1: group by content digest. Every pair within a group is an
    // exact duplicate regardless of what MinHash would estimate.
    let mut by_digest: HashMap<&str, Vec<&DocumentSignature>> = HashMap::new();
    for sig in signatures.values() {
        by_digest.entry(sig.content_hash.as_str()).or_default().push(sig);
    }
    for group in by_digest.values() {
        if group.len() < 2 {
            continue;
        }
        for i in 0..group.len() {
            for j in (i + 1)..group.len() {
                // Record the key up front: a pair whose metadata lookup
                // fails here must still be suppressed in phase 2, not
                // downgraded to a minhash pair.
                exact_keys.insert(pair_id(&group[i].path, &group[j].path));
                if let Some(pair) =
                    build_pair(source, group[i], group[j], 1.0, DetectionMethod::Exact)
                {
                    pairs.push(pair);
                }
            }
        }
    }

    // Phase 2: exhaustive pairwise MinHash comparison. BTreeMap iteration
    // order makes the traversal deterministic for a given corpus.
    let entries: Vec<&DocumentSignature> = signatures.values().collect();
    let n = entries.len();
    let total_comparisons = n.saturating_mul(n.saturating_sub(1)) / 2;
    let mut comparisons_done = 0usize;

    for i in 0..n {
        if cancel.is_cancelled() {
            return Ok(pairs);
        }
        if i % PROGRESS_STRIDE == 0 {
            if let Some(progress) = on_progress {
                progress(ScanProgress {
                    phase: ScanPhase::Comparing,
                    current: comparisons_done,
                    total: total_comparisons,
                    current_path: None,
                });
            }
        }
        for j in (i + 1)..n {
            comparisons_done += 1;
            let (left, right) = (entries[i], entries[j]);
            let key = pair_id(&left.path, &right.path);
            if exact_keys.contains(&key) {
                continue;
            }
            let similarity = estimate_similarity(&left.minhash, &right.minhash)?;
            if similarity >= threshold {
                if let Some(pair) =
                    build_pair(source, left, right, similarity, DetectionMethod::Minhash)
                {
                    pairs.push(pair);
                }
            }
        }
    }

    Ok(pairs)
}

/// Assemble a pair, fetching fresh metadata for both sides. If either
/// document's metadata is no longer available (deleted mid-scan), the pair
/// is skipped rather than failing the whole scan.
fn build_pair(
    source: &dyn DocumentSource,
    left: &DocumentSignature,
    right: &DocumentSignature,
    similarity: f64,
    method: DetectionMethod,
) -> Option<DuplicatePair> {
    let meta_a = match source.metadata(&left.path) {
        Ok(meta) => meta,
        Err(err) => {
            tracing::debug!(path = %left.path, %err, "skipping pair, metadata unavailable");
            return None;
        }
    };
    let meta_b = match source.metadata(&right.path) {
        Ok(meta) => meta,
        Err(err) => {
            tracing::debug!(path = %right.path, %err, "skipping pair, metadata unavailable");
            return None;
        }
    };
    Some(DuplicatePair {
        id: pair_id(&left.path, &right.path),
        path_a: left.path.clone(),
        path_b: right.path.clone(),
        similarity,
        method,
        metadata: PairMetadata {
            created_a: meta_a.created,
            created_b: meta_b.created,
            modified_a: meta_a.modified,
            modified_b: meta_b.modified,
            size_a: meta_a.size,
            size_b: meta_b.size,
            lines_a: left.line_count,
            lines_b: right.line_count,
        },
    })
}
