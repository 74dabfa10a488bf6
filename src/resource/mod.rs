//! The yaml resource: a configured locate-and-patch engine instance.
//!
//! A [`Resource`] owns the compiled locator and the candidate file set for
//! one invocation; no two resources ever share a document tree. Files are
//! processed sequentially in configuration order, and the three operating
//! modes live in their own modules: `source`, `condition`, `target`.

mod condition;
mod source;
pub mod spec;
mod target;

pub use spec::Spec;

use std::path::Path;

use indexmap::IndexMap;

use crate::document::NodePath;
use crate::error::Result;
use crate::file::{file_set, CandidateFile};
use crate::locator::{compile, EngineKind, Locator};

/// A configured engine invocation over one file set.
pub struct Resource {
    spec: Spec,
    engine: EngineKind,
    locator: Box<dyn Locator>,
    files: IndexMap<String, CandidateFile>,
}

impl Resource {
    /// Builds a resource from a spec, or fails with a `Configuration` /
    /// `PathParse` error before any file is touched.
    pub fn new(spec: Spec) -> Result<Self> {
        spec.validate()?;
        let engine = spec.engine_kind()?;
        let locator = compile(engine, &spec.key)?;
        let files = file_set(spec.file.as_deref(), &spec.files);

        Ok(Self {
            spec,
            engine,
            locator,
            files,
        })
    }

    pub fn spec(&self) -> &Spec {
        &self.spec
    }

    /// Resolves relative candidate paths against the working directory
    /// (typically an SCM checkout), then reads and parses every file.
    fn prepare(&mut self, workdir: Option<&Path>) -> Result<()> {
        if let Some(workdir) = workdir {
            for file in self.files.values_mut() {
                file.resolve_workdir(workdir);
            }
        }
        for file in self.files.values_mut() {
            file.read()?;
        }
        Ok(())
    }
}

/// Resolves the locator once per sub-document of interest, honoring the
/// configured document index.
fn matches_in(
    locator: &dyn Locator,
    document_index: Option<usize>,
    file: &CandidateFile,
) -> Vec<(usize, NodePath)> {
    let mut matches = Vec::new();
    for (index, doc) in file.documents().iter().enumerate() {
        if let Some(wanted) = document_index {
            if index != wanted {
                continue;
            }
        }
        for path in locator.resolve(doc) {
            matches.push((index, path));
        }
    }
    matches
}
