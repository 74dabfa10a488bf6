//! Source mode: produce a string value from one file.

use std::path::Path;

use tracing::warn;

use super::{matches_in, Resource};
use crate::error::{Error, Result};

impl Resource {
    /// Returns the first scalar value the key resolves to.
    ///
    /// A source reads exactly one file; failing to resolve the key is an
    /// error (there is no search-pattern policy on sources).
    pub fn source(&mut self, workdir: Option<&Path>) -> Result<String> {
        if self.files.len() > 1 {
            return Err(Error::Configuration {
                message: "a source expects a single file, not a 'files' list".to_string(),
            });
        }
        if self.spec.key_only {
            return Err(Error::Configuration {
                message: "'keyonly' is only supported by conditions".to_string(),
            });
        }
        if self.spec.value.is_some() {
            warn!("'value' is ignored when the resource is used as a source");
        }

        self.prepare(workdir)?;

        let Self {
            spec,
            locator,
            files,
            ..
        } = self;
        let file = files.values().next().ok_or_else(|| Error::Configuration {
            message: "no yaml file configured".to_string(),
        })?;

        for (doc_index, path) in matches_in(locator.as_ref(), spec.document_index, file) {
            let Some(node) = file.documents()[doc_index].node_at(&path) else {
                continue;
            };
            match node.scalar_value() {
                Some(value) => return Ok(value.to_string()),
                None => {
                    return Err(Error::NotScalar {
                        file: file.original_path().to_string(),
                        key: spec.key.clone(),
                    })
                }
            }
        }

        Err(Error::KeyNotFound {
            file: file.original_path().to_string(),
            key: spec.key.clone(),
        })
    }
}
