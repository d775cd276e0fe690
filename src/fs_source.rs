//! Filesystem-backed document source.
//!
//! Walks a root directory recursively, exposing matching files as
//! documents keyed by their `/`-separated relative path. Trashing moves a
//! file into a `.dupscan-trash` directory under the root rather than
//! deleting it, so a mistaken duplicate resolution is recoverable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use scanner::{DocumentMeta, DocumentSource, SourceError};

/// Directory under the scan root that holds trashed documents. Never
/// enumerated by [`FsDocumentSource::list`].
pub const TRASH_DIR: &str = ".dupscan-trash";

/// A [`DocumentSource`] over a directory tree.
pub struct FsDocumentSource {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FsDocumentSource {
    /// Create a source over `root`, scanning Markdown and plain-text
    /// files by default.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: vec!["md".into(), "txt".into()],
        }
    }

    /// Replace the set of file extensions (without dots) to scan.
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.to_ascii_lowercase())
            .collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute(&self, path: &str) -> PathBuf {
        let mut abs = self.root.clone();
        for component in path.split('/') {
            abs.push(component);
        }
        abs
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|want| *want == ext)
            })
            .unwrap_or(false)
    }

    fn walk(&self, dir: &Path, out: &mut Vec<String>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                if path.file_name().and_then(|n| n.to_str()) == Some(TRASH_DIR) {
                    continue;
                }
                self.walk(&path, out)?;
            } else if file_type.is_file() && self.matches_extension(&path) {
                if let Some(rel) = self.relative_key(&path) {
                    out.push(rel);
                }
            }
        }
        Ok(())
    }

    fn relative_key(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let mut key = String::new();
        for component in rel.components() {
            if !key.is_empty() {
                key.push('/');
            }
            key.push_str(component.as_os_str().to_str()?);
        }
        Some(key)
    }
}

fn io_error(path: &str, err: io::Error) -> SourceError {
    if err.kind() == io::ErrorKind::NotFound {
        SourceError::NotFound(path.to_string())
    } else {
        SourceError::Io(format!("{path}: {err}"))
    }
}

fn epoch_millis(time: io::Result<std::time::SystemTime>) -> Option<i64> {
    time.ok()?
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_millis() as i64)
}

impl DocumentSource for FsDocumentSource {
    fn list(&self) -> Result<Vec<String>, SourceError> {
        let mut paths = Vec::new();
        self.walk(&self.root, &mut paths)
            .map_err(|err| SourceError::Io(format!("{}: {err}", self.root.display())))?;
        paths.sort();
        Ok(paths)
    }

    fn read(&self, path: &str) -> Result<String, SourceError> {
        fs::read_to_string(self.absolute(path)).map_err(|err| io_error(path, err))
    }

    fn metadata(&self, path: &str) -> Result<DocumentMeta, SourceError> {
        let meta = fs::metadata(self.absolute(path)).map_err(|err| io_error(path, err))?;
        let modified = epoch_millis(meta.modified()).unwrap_or(0);
        // Creation time is not available on every filesystem; fall back
        // to the modification time.
        let created = epoch_millis(meta.created()).unwrap_or(modified);
        Ok(DocumentMeta {
            created,
            modified,
            size: meta.len(),
        })
    }

    fn trash(&self, path: &str) -> Result<(), SourceError> {
        let from = self.absolute(path);
        if !from.exists() {
            return Err(SourceError::NotFound(path.to_string()));
        }
        let trash_dir = self.root.join(TRASH_DIR);
        fs::create_dir_all(&trash_dir).map_err(|err| io_error(path, err))?;
        // Flatten the relative path so trashed files from different
        // folders cannot collide on file name alone.
        let mut name = path.replace('/', "__");
        let mut dest = trash_dir.join(&name);
        let mut attempt = 1u32;
        while dest.exists() {
            name = format!("{attempt}-{}", path.replace('/', "__"));
            dest = trash_dir.join(&name);
            attempt += 1;
        }
        fs::rename(&from, &dest).map_err(|err| io_error(path, err))
    }
}
