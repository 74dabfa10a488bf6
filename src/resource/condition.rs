//! Condition mode: verify that a key holds an expected value.

use std::path::Path;

use tracing::debug;

use super::{matches_in, Resource};
use crate::error::{Error, Result};
use crate::report::ConditionResult;

impl Resource {
    /// Checks every candidate file against the expected value.
    ///
    /// The condition passes only if every non-excluded file matches and at
    /// least one file was not excluded. Under `searchpattern`, files where
    /// the key is altogether absent are excluded from consideration
    /// instead of failing the run; without it, absence is a hard error.
    pub fn condition(
        &mut self,
        source_input: Option<&str>,
        workdir: Option<&Path>,
    ) -> Result<ConditionResult> {
        if source_input.is_some() && self.spec.value.is_some() {
            return Err(Error::Configuration {
                message: "an input source value was provided while 'value' is set; \
                          remove one of the two"
                    .to_string(),
            });
        }

        self.prepare(workdir)?;

        let expected = self
            .spec
            .value
            .clone()
            .or_else(|| source_input.map(str::to_string))
            .unwrap_or_default();

        let mut errors: Vec<Error> = Vec::new();
        let mut resolved: Vec<(String, String)> = Vec::new();
        let mut ignored = 0usize;

        let Self {
            spec,
            locator,
            files,
            ..
        } = self;

        for file in files.values() {
            let matches = matches_in(locator.as_ref(), spec.document_index, file);
            if matches.is_empty() {
                if spec.search_pattern {
                    debug!(
                        file = file.original_path(),
                        key = %spec.key,
                        "key not found, file excluded by search pattern"
                    );
                    ignored += 1;
                    continue;
                }
                errors.push(Error::KeyNotFound {
                    file: file.original_path().to_string(),
                    key: spec.key.clone(),
                });
                continue;
            }

            for (doc_index, path) in matches {
                let Some(node) = file.documents()[doc_index].node_at(&path) else {
                    continue;
                };
                match node.scalar_value() {
                    Some(value) => {
                        resolved.push((file.original_path().to_string(), value.to_string()));
                    }
                    None if spec.key_only => {
                        // Existence is the whole check; a mapping counts.
                        resolved.push((file.original_path().to_string(), String::new()));
                    }
                    None => errors.push(Error::NotScalar {
                        file: file.original_path().to_string(),
                        key: spec.key.clone(),
                    }),
                }
            }
        }

        if !errors.is_empty() {
            if spec.key_only && errors.iter().all(Error::is_key_not_found) {
                return Ok(ConditionResult {
                    pass: false,
                    description: format!("key {:?} not found in yaml file(s)", spec.key),
                });
            }
            return Err(match errors.len() {
                1 => errors.remove(0),
                _ => Error::Aggregate { errors },
            });
        }

        if files.len() == ignored {
            return Ok(ConditionResult {
                pass: false,
                description: "no file found matching criteria".to_string(),
            });
        }

        if spec.key_only {
            let paths: Vec<&str> = resolved.iter().map(|(file, _)| file.as_str()).collect();
            return Ok(ConditionResult {
                pass: true,
                description: format!(
                    "key {:?} found in yaml file(s) [{}]",
                    spec.key,
                    paths.join(", ")
                ),
            });
        }

        for (file, value) in &resolved {
            if value != &expected {
                return Ok(ConditionResult {
                    pass: false,
                    description: format!(
                        "key {:?} is incorrectly set to {:?} in file {:?}, should be {:?}",
                        spec.key, value, file, expected
                    ),
                });
            }
        }

        Ok(ConditionResult {
            pass: true,
            description: format!("key {:?} is correctly set to {:?}", spec.key, expected),
        })
    }
}
