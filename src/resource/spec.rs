//! Resource configuration surface.
//!
//! The Spec is what callers hand the engine: which file(s), which key,
//! what value, and the policy flags. It deserializes from a YAML manifest
//! (lowercase keys, snake_case aliases accepted) and validates all
//! mutually-exclusive and missing-field rules up front — configuration
//! errors are surfaced immediately and never retried.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::locator::EngineKind;

/// Configuration for one yaml resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Spec {
    /// Single yaml file path. Mutually exclusive with `files`.
    /// A `file://` prefix is accepted and stripped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// List of yaml file paths. Mutually exclusive with `file`;
    /// must be duplicate-free.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,

    /// The path expression identifying the node to manipulate.
    /// Dotted syntax (`agents[0].name`) for the legacy engine, yamlpath
    /// syntax (`$.agents[0].name`) for the path-query engine.
    #[serde(default)]
    pub key: String,

    /// Desired value (target), or expected value (condition/source checks).
    /// Mutually exclusive with an externally supplied source input for
    /// conditions; overrides it for targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Only check that the key resolves to something, ignoring its value.
    /// Conditions only; mutually exclusive with `value`.
    #[serde(default, rename = "keyonly", alias = "key_only")]
    pub key_only: bool,

    /// Tolerate-absence policy: a file where the key is missing is
    /// silently excluded from the run instead of failing it.
    #[serde(default, rename = "searchpattern", alias = "search_pattern")]
    pub search_pattern: bool,

    /// Zero-based selector choosing one sub-document in a multi-document
    /// stream. When unset, every sub-document is evaluated.
    #[serde(default, rename = "documentindex", alias = "document_index")]
    pub document_index: Option<usize>,

    /// Trailing line comment to attach when a target rewrites a value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Path engine: `legacy` or `yamlpath`. When unset, keys beginning
    /// with `$` select the path-query engine, anything else the legacy one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,

    /// Indentation for the structural re-encoder (legacy engine targets).
    /// Defaults to 2.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<i64>,
}

impl Spec {
    fn has_file(&self) -> bool {
        self.file.as_deref().is_some_and(|f| !f.is_empty())
    }

    /// Validates the spec, returning every failed rule in one error.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if !self.has_file() && self.files.is_empty() {
            problems.push("both 'file' and 'files' are empty".to_string());
        }
        if self.has_file() && !self.files.is_empty() {
            problems.push("'file' and 'files' are mutually exclusive".to_string());
        }
        if self.files.len() > 1 && has_duplicates(&self.files) {
            problems.push("'files' contains duplicated values".to_string());
        }
        if self.key.is_empty() {
            problems.push("'key' is empty".to_string());
        }
        if self.key_only && self.value.is_some() {
            problems.push(
                "'value' and 'keyonly' are mutually exclusive, remove one of the two directives"
                    .to_string(),
            );
        }
        if self.indent.is_some_and(|n| n < 0) {
            problems.push("'indent' must be >= 0".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Configuration {
                message: problems.join("\n"),
            })
        }
    }

    /// Which path engine this spec selects.
    pub fn engine_kind(&self) -> Result<EngineKind> {
        match self.engine.as_deref() {
            None | Some("") => {
                if self.key.trim_start().starts_with('$') {
                    Ok(EngineKind::YamlPath)
                } else {
                    Ok(EngineKind::Legacy)
                }
            }
            Some("legacy") => Ok(EngineKind::Legacy),
            Some("yamlpath") => Ok(EngineKind::YamlPath),
            Some(other) => Err(Error::Configuration {
                message: format!("unsupported engine {:?}", other),
            }),
        }
    }

    /// Structural-encoder indentation, defaulting to 2.
    pub fn effective_indent(&self) -> usize {
        match self.indent {
            Some(n) if n > 0 => n as usize,
            _ => 2,
        }
    }
}

fn has_duplicates(values: &[String]) -> bool {
    let mut seen = std::collections::HashSet::new();
    values.iter().any(|v| !seen.insert(v))
}
