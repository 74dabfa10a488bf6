//! Target mode: rewrite a key's value across the candidate file set.

use std::path::Path;

use tracing::debug;

use super::{matches_in, Resource};
use crate::error::{Error, Result};
use crate::file::{render_preserving, render_structural, write_file_atomic};
use crate::locator::EngineKind;
use crate::report::{AggregateResult, MatchOutcome, Outcome, TargetResult};

impl Resource {
    /// Applies the desired value to every location the key resolves to.
    ///
    /// Idempotent: locations already holding the value are counted but
    /// never rewritten, and a second run reports `changed = false`. In
    /// dry-run the new content is rendered for the diff narrative but the
    /// write step is skipped entirely.
    pub fn target(
        &mut self,
        source_input: Option<&str>,
        workdir: Option<&Path>,
        dry_run: bool,
    ) -> Result<TargetResult> {
        if self.spec.key_only {
            return Err(Error::Configuration {
                message: "'keyonly' is only supported by conditions".to_string(),
            });
        }

        let desired = match (&self.spec.value, source_input) {
            (Some(value), Some(_)) => {
                debug!("using 'value' from the spec instead of the input source value");
                value.clone()
            }
            (Some(value), None) => value.clone(),
            (None, Some(source)) => source.to_string(),
            (None, None) => {
                return Err(Error::Configuration {
                    message: "no value to write: set 'value' or provide a source input"
                        .to_string(),
                })
            }
        };

        if let Some(workdir) = workdir {
            for file in self.files.values_mut() {
                file.resolve_workdir(workdir);
            }
        }
        self.validate_target_file_paths()?;
        for file in self.files.values_mut() {
            file.read()?;
        }

        let indent = self.spec.effective_indent();
        let engine = self.engine;
        let mut aggregate = AggregateResult::new(self.files.len());

        let Self {
            spec,
            locator,
            files,
            ..
        } = self;

        for file in files.values_mut() {
            let matches = matches_in(locator.as_ref(), spec.document_index, file);
            if matches.is_empty() {
                if spec.search_pattern {
                    debug!(
                        file = file.original_path(),
                        key = %spec.key,
                        "key not found, file excluded by search pattern"
                    );
                    aggregate.files_ignored += 1;
                    continue;
                }
                return Err(Error::KeyNotFound {
                    file: file.original_path().to_string(),
                    key: spec.key.clone(),
                });
            }

            let mut file_changed = false;
            for (doc_index, path) in matches {
                let Some(node) = file.documents()[doc_index].node_at(&path) else {
                    continue;
                };
                let Some(old_value) = node.scalar_value().map(str::to_string) else {
                    return Err(Error::NotScalar {
                        file: file.original_path().to_string(),
                        key: spec.key.clone(),
                    });
                };

                let changed = old_value != desired;
                if changed {
                    let _ = file.documents_mut()[doc_index].set_scalar(
                        &path,
                        &desired,
                        spec.comment.as_deref(),
                    );
                    file_changed = true;
                }

                aggregate.record(
                    &MatchOutcome {
                        file: file.original_path().to_string(),
                        document_index: doc_index,
                        found: true,
                        old_value: Some(old_value),
                        changed,
                    },
                    &spec.key,
                    &desired,
                    dry_run,
                );
            }

            if !file_changed {
                continue;
            }

            let new_content = match engine {
                EngineKind::Legacy => render_structural(file.documents(), indent),
                EngineKind::YamlPath => {
                    render_preserving(file.documents(), file.content().unwrap_or_default())
                }
            };
            file.set_content(new_content);

            if !dry_run {
                write_file_atomic(
                    file.resolved_path(),
                    file.content().unwrap_or_default().as_bytes(),
                )
                .map_err(|err| Error::io(file.resolved_path().display().to_string(), err))?;
            }

            aggregate.mark_file_changed(file.resolved_path().display().to_string());
        }

        aggregate.files_changed.sort();
        let outcome = aggregate.outcome();

        // A target configured to operate on zero files after exclusion has
        // nothing to patch anywhere; that is a hard failure, unlike a
        // condition, which merely reports a non-pass.
        if outcome == Outcome::NoFileMatched {
            let considered: Vec<&str> = files.keys().map(String::as_str).collect();
            return Err(Error::KeyNotFound {
                file: considered.join(", "),
                key: spec.key.clone(),
            });
        }

        Ok(TargetResult {
            changed: outcome == Outcome::Changed,
            files: aggregate.files_changed.clone(),
            description: aggregate.description(),
            outcome,
        })
    }

    /// Targets rewrite files in place: remote URLs and missing files are
    /// rejected up front (no force-create).
    fn validate_target_file_paths(&self) -> Result<()> {
        let mut errors = Vec::new();
        for file in self.files.values() {
            if file.is_url() {
                errors.push(Error::Configuration {
                    message: format!(
                        "{}: URL scheme is not supported for a target",
                        file.original_path()
                    ),
                });
            } else if !file.exists() {
                errors.push(Error::io(
                    file.resolved_path().display().to_string(),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "the yaml file does not exist"),
                ));
            }
        }
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(Error::Aggregate { errors }),
        }
    }
}
