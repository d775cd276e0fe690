//! Exact-digest hashing for canonical content.
//!
//! The digest is the authority for exact-duplicate classification: two
//! documents are exact duplicates iff their canonical content digests are
//! equal. SHA-256 keeps the collision probability negligible at corpus
//! scale, so stored documents never need byte-for-byte re-comparison.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of canonical content over its UTF-8 bytes,
/// returned as a 64-character lowercase hex string.
pub fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
