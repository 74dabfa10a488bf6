//! Candidate file lifecycle: lazy reads and working-directory resolution.
//!
//! A [`CandidateFile`] is created when the engine is configured, but its
//! content and document model are only populated on first read. The
//! resolved path is fixed once a working directory is known (typically an
//! SCM checkout supplied by the caller) and never changes afterwards.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;

use crate::document::{parse_documents, Document};
use crate::error::{Error, Result};

/// One file the engine operates on.
#[derive(Debug)]
pub struct CandidateFile {
    original_path: String,
    resolved_path: PathBuf,
    content: Option<String>,
    documents: Vec<Document>,
}

impl CandidateFile {
    /// Creates a candidate from a user-supplied path. A `file://` prefix is
    /// stripped; `http(s)://` paths are kept verbatim and flagged by
    /// [`CandidateFile::is_url`].
    pub fn new(path: &str) -> Self {
        let path = path.strip_prefix("file://").unwrap_or(path);
        Self {
            original_path: path.to_string(),
            resolved_path: PathBuf::from(path),
            content: None,
            documents: Vec::new(),
        }
    }

    /// The path as the user wrote it (minus any `file://` prefix).
    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    /// The on-disk path after working-directory resolution.
    pub fn resolved_path(&self) -> &Path {
        &self.resolved_path
    }

    /// Whether the original path is a remote URL rather than a file.
    pub fn is_url(&self) -> bool {
        self.original_path.starts_with("https://") || self.original_path.starts_with("http://")
    }

    /// Joins a relative candidate path onto the working directory. Absolute
    /// paths and URLs are left untouched. Must be called before the first
    /// read; the resolved path never changes afterwards.
    pub fn resolve_workdir(&mut self, workdir: &Path) {
        if self.is_url() || Path::new(&self.original_path).is_absolute() {
            return;
        }
        self.resolved_path = workdir.join(&self.original_path);
        debug!(
            original = %self.original_path,
            resolved = %self.resolved_path.display(),
            "relative path resolved against working directory"
        );
    }

    /// Whether the resolved path exists on disk.
    pub fn exists(&self) -> bool {
        self.resolved_path.exists()
    }

    /// Reads and parses the file. Lazy: a second call is a no-op.
    pub fn read(&mut self) -> Result<()> {
        if self.content.is_some() {
            return Ok(());
        }
        let content = std::fs::read_to_string(&self.resolved_path)
            .map_err(|err| Error::io(self.resolved_path.display().to_string(), err))?;
        self.documents = parse_documents(&content, &self.original_path)?;
        self.content = Some(content);
        Ok(())
    }

    /// The raw content, once read.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// The parsed sub-documents, once read.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> &mut [Document] {
        &mut self.documents
    }

    /// Replaces the in-memory content after re-serialization. The document
    /// model is left as mutated; a fresh read would rebuild it.
    pub fn set_content(&mut self, content: String) {
        self.content = Some(content);
    }
}

/// Builds the insertion-ordered candidate set from the configured
/// `file`/`files` surface. Keyed by original path, so duplicates collapse —
/// validation has already rejected them by the time this runs.
pub fn file_set(file: Option<&str>, files: &[String]) -> IndexMap<String, CandidateFile> {
    let mut set = IndexMap::new();
    if let Some(path) = file {
        let candidate = CandidateFile::new(path);
        set.insert(candidate.original_path().to_string(), candidate);
    }
    for path in files {
        let candidate = CandidateFile::new(path);
        set.insert(candidate.original_path().to_string(), candidate);
    }
    set
}
