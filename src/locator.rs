//! The locator capability shared by the two path engines.
//!
//! Engine choice is configuration, not runtime type inspection: a resource
//! compiles its key expression once into a boxed [`Locator`] and applies it
//! to every sub-document of every candidate file.

use crate::document::{Document, NodePath};
use crate::error::{Error, Result};
use crate::keypath;
use crate::yamlpath;

/// Which path engine a resource runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// Dotted key paths resolved with column scoping; structural re-render.
    Legacy,
    /// yamlpath queries (wildcards, filters); full-fidelity re-render.
    YamlPath,
}

/// Resolves a compiled path expression against one document.
pub trait Locator: std::fmt::Debug {
    /// Index paths of every node the expression addresses in `doc`.
    /// Zero matches is not an error here; strict-vs-search policy belongs
    /// to the caller.
    fn resolve(&self, doc: &Document) -> Vec<NodePath>;
}

/// Compiles `key` for the given engine.
pub fn compile(engine: EngineKind, key: &str) -> Result<Box<dyn Locator>> {
    match engine {
        EngineKind::Legacy => Ok(Box::new(KeyPathLocator::new(key)?)),
        EngineKind::YamlPath => Ok(Box::new(YamlPathLocator::new(key)?)),
    }
}

/// The column-scoped dotted-path engine. Resolves at most one node.
#[derive(Debug)]
pub struct KeyPathLocator {
    segments: Vec<keypath::Segment>,
}

impl KeyPathLocator {
    pub fn new(expression: &str) -> Result<Self> {
        let segments = keypath::parse(expression).map_err(|err| Error::PathParse {
            expression: expression.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self { segments })
    }
}

impl Locator for KeyPathLocator {
    fn resolve(&self, doc: &Document) -> Vec<NodePath> {
        keypath::locate(doc, &self.segments).into_iter().collect()
    }
}

/// The yamlpath engine. May resolve many nodes (bulk replace semantics).
#[derive(Debug)]
pub struct YamlPathLocator {
    path: yamlpath::YamlPath,
}

impl YamlPathLocator {
    pub fn new(expression: &str) -> Result<Self> {
        let path = yamlpath::Parser::parse(expression).map_err(|err| Error::PathParse {
            expression: expression.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self { path })
    }
}

impl Locator for YamlPathLocator {
    fn resolve(&self, doc: &Document) -> Vec<NodePath> {
        yamlpath::Evaluator::new(doc.root()).evaluate(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_documents;

    fn single(content: &str) -> Document {
        parse_documents(content, "test.yaml")
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn test_both_engines_resolve_the_same_simple_key() {
        let doc = single("github:\n  owner: olblak\n");

        let legacy = compile(EngineKind::Legacy, "github.owner").unwrap();
        let query = compile(EngineKind::YamlPath, "$.github.owner").unwrap();

        assert_eq!(legacy.resolve(&doc), query.resolve(&doc));
    }

    #[test]
    fn test_compile_error_names_the_expression() {
        let err = compile(EngineKind::Legacy, "a.b[x]").unwrap_err();
        match err {
            Error::PathParse { expression, .. } => assert_eq!(expression, "a.b[x]"),
            other => panic!("expected PathParse, got {}", other),
        }

        let err = compile(EngineKind::YamlPath, "github.owner").unwrap_err();
        assert!(matches!(err, Error::PathParse { .. }));
    }
}
