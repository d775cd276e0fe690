//! dupscan canonical content layer.
//!
//! This crate turns raw document text into a deterministic canonical form and
//! hashes it. Downstream stages (shingling, MinHash, exact-duplicate grouping)
//! rely on this for stable identity.
//!
//! ## What we do
//!
//! - Strip a leading front-matter block (`---` fenced) when present
//! - Unify line endings to `\n`
//! - Cap blank-line runs at a single blank line
//! - Trim leading/trailing whitespace
//! - SHA-256 content digest for exact-duplicate classification
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no locale dependence. Same input, same output, on
//! any machine. Normalization is idempotent: `normalize(normalize(x)) ==
//! normalize(x)`.

mod hash;
mod normalize;

pub use crate::hash::content_digest;
pub use crate::normalize::{count_lines, normalize};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_then_digest_equivalent_inputs_match() {
        let a = "---\ntitle: Weekly review\n---\n\nThe same body.\r\n";
        let b = "The same body.";

        let norm_a = normalize(a);
        let norm_b = normalize(b);

        assert_eq!(norm_a, norm_b);
        assert_eq!(content_digest(&norm_a), content_digest(&norm_b));
    }

    #[test]
    fn digest_distinguishes_different_content() {
        let a = normalize("alpha body text");
        let b = normalize("bravo body text");
        assert_ne!(content_digest(&a), content_digest(&b));
    }
}
