//! Corpus-wide common-shingle filtering.
//!
//! Shingles that appear in a large fraction of the corpus (structural
//! boilerplate, repeated headers, template text) carry no discriminative
//! signal and make unrelated documents look similar. This module tracks
//! per-shingle document frequency during a build pass over the whole corpus
//! and drops over-common shingles before signature computation.
//!
//! Protocol: call [`CorpusFilter::observe`] once per document, for every
//! document, then call [`CorpusFilter::filter`]. The frequency table is
//! mutated only during the build phase; filtering reads it. Observation
//! order does not matter.

use std::collections::HashMap;

use crate::config::PerceptualError;
use crate::shingles::ShingleSet;

/// Document-frequency table for shingles across one corpus pass.
#[derive(Debug)]
pub struct CorpusFilter {
    document_frequency: HashMap<String, u32>,
    total_documents: u32,
    threshold: f64,
}

/// Summary of the filter state after a build pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterStats {
    /// Distinct shingles observed across the corpus.
    pub total_shingles: usize,
    /// How many of those exceed the frequency cutoff and would be dropped.
    pub filtered_shingles: usize,
    /// Documents observed during the build pass.
    pub total_documents: u32,
}

impl CorpusFilter {
    /// Create a filter with a document-frequency threshold in (0, 1).
    ///
    /// A shingle observed in more than `floor(total_documents * threshold)`
    /// documents is dropped by [`filter`](Self::filter). Stricter
    /// (smaller) thresholds let fewer shingles survive.
    pub fn new(threshold: f64) -> Result<Self, PerceptualError> {
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(PerceptualError::InvalidFilterThreshold { threshold });
        }
        Ok(Self {
            document_frequency: HashMap::new(),
            total_documents: 0,
            threshold,
        })
    }

    /// Ingest one document's shingle set into the frequency table.
    pub fn observe(&mut self, shingles: &ShingleSet) {
        self.total_documents += 1;
        for shingle in shingles {
            *self.document_frequency.entry(shingle.clone()).or_insert(0) += 1;
        }
    }

    /// Return the subset of `shingles` that survives the frequency cutoff.
    ///
    /// Identity when no documents have been observed.
    pub fn filter(&self, shingles: &ShingleSet) -> ShingleSet {
        if self.total_documents == 0 {
            return shingles.clone();
        }

        let max_count = self.max_count();
        shingles
            .iter()
            .filter(|s| self.frequency(s) <= max_count)
            .cloned()
            .collect()
    }

    /// Statistics over the current frequency table.
    pub fn stats(&self) -> FilterStats {
        let max_count = self.max_count();
        let filtered_shingles = self
            .document_frequency
            .values()
            .filter(|&&count| count > max_count)
            .count();
        FilterStats {
            total_shingles: self.document_frequency.len(),
            filtered_shingles,
            total_documents: self.total_documents,
        }
    }

    fn max_count(&self) -> u32 {
        (f64::from(self.total_documents) * self.threshold).floor() as u32
    }

    fn frequency(&self, shingle: &str) -> u32 {
        self.document_frequency.get(shingle).copied().unwrap_or(0)
    }
}
