//! In-memory document source for tests, demos, and benches.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::source::{DocumentMeta, DocumentSource, SourceError};

#[derive(Debug)]
struct MemoryDoc {
    content: String,
    meta: DocumentMeta,
}

/// A [`DocumentSource`] backed by an in-memory map.
#[derive(Debug, Default)]
pub struct MemorySource {
    docs: RwLock<BTreeMap<String, MemoryDoc>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document with zeroed metadata apart from its byte size.
    pub fn insert(&self, path: &str, content: &str) {
        self.insert_with_meta(
            path,
            content,
            DocumentMeta {
                created: 0,
                modified: 0,
                size: content.len() as u64,
            },
        );
    }

    /// Insert a document with explicit metadata.
    pub fn insert_with_meta(&self, path: &str, content: &str, meta: DocumentMeta) {
        let mut docs = self.docs.write().expect("memory source lock poisoned");
        docs.insert(
            path.to_string(),
            MemoryDoc {
                content: content.to_string(),
                meta,
            },
        );
    }

    /// Overwrite a document's content and bump its modification time.
    pub fn update(&self, path: &str, content: &str, modified: i64) {
        let mut docs = self.docs.write().expect("memory source lock poisoned");
        if let Some(doc) = docs.get_mut(path) {
            doc.content = content.to_string();
            doc.meta.modified = modified;
            doc.meta.size = content.len() as u64;
        }
    }

    /// Remove a document outright, simulating external deletion.
    pub fn remove(&self, path: &str) {
        let mut docs = self.docs.write().expect("memory source lock poisoned");
        docs.remove(path);
    }

    pub fn contains(&self, path: &str) -> bool {
        let docs = self.docs.read().expect("memory source lock poisoned");
        docs.contains_key(path)
    }

    pub fn len(&self) -> usize {
        let docs = self.docs.read().expect("memory source lock poisoned");
        docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentSource for MemorySource {
    fn list(&self) -> Result<Vec<String>, SourceError> {
        let docs = self.docs.read().expect("memory source lock poisoned");
        Ok(docs.keys().cloned().collect())
    }

    fn read(&self, path: &str) -> Result<String, SourceError> {
        let docs = self.docs.read().expect("memory source lock poisoned");
        docs.get(path)
            .map(|doc| doc.content.clone())
            .ok_or_else(|| SourceError::NotFound(path.to_string()))
    }

    fn metadata(&self, path: &str) -> Result<DocumentMeta, SourceError> {
        let docs = self.docs.read().expect("memory source lock poisoned");
        docs.get(path)
            .map(|doc| doc.meta)
            .ok_or_else(|| SourceError::NotFound(path.to_string()))
    }

    fn trash(&self, path: &str) -> Result<(), SourceError> {
        let mut docs = self.docs.write().expect("memory source lock poisoned");
        docs.remove(path)
            .map(|_| ())
            .ok_or_else(|| SourceError::NotFound(path.to_string()))
    }
}
