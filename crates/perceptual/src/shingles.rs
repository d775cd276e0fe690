//! Word shingling over canonical content.
//!
//! A shingle is a contiguous run of `k` word tokens joined by single spaces.
//! Comparing shingle sets instead of whole documents makes similarity robust
//! to paragraph reordering and local edits.

use std::collections::HashSet;

/// The unordered, deduplicated set of shingles for one document.
pub type ShingleSet = HashSet<String>;

/// Build the shingle set for canonical content.
///
/// Tokenization: lowercase, replace every character that is neither
/// alphanumeric nor whitespace with a space, split on whitespace runs.
/// A window of width `k` then slides over the token sequence with stride 1.
///
/// Edge cases: fewer than `k` tokens but at least one yields a single
/// shingle of all tokens; no tokens yields the empty set.
pub fn shingle(content: &str, k: usize) -> ShingleSet {
    let tokens = tokenize(content);
    let mut shingles = ShingleSet::new();

    if tokens.is_empty() || k == 0 {
        return shingles;
    }

    if tokens.len() < k {
        shingles.insert(tokens.join(" "));
        return shingles;
    }

    for window in tokens.windows(k) {
        shingles.insert(window.join(" "));
    }
    shingles
}

fn tokenize(content: &str) -> Vec<String> {
    let cleaned: String = content
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .map(|t| t.to_string())
        .collect()
}
