//! Sub-document wrapper and index-path navigation.
//!
//! A file stream parses to one or more [`Document`]s. Nodes inside a
//! document are addressed by a [`NodePath`]: a sequence of child indices
//! from the root, where an index selects the nth mapping entry or the nth
//! sequence item. Paths are the structural identity used for mutation —
//! both locators produce them, and mutation always goes through the
//! document that exclusively owns the tree.

use super::node::{Node, NodeValue};

/// A path of child indices from a document root to a node.
pub type NodePath = Vec<usize>;

/// One YAML sub-document: a root node plus whether the source introduced it
/// with an explicit `---` marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Node,
    explicit_start: bool,
}

impl Document {
    pub fn new(root: Node, explicit_start: bool) -> Self {
        Self {
            root,
            explicit_start,
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Whether the source stream wrote `---` before this document.
    pub fn explicit_start(&self) -> bool {
        self.explicit_start
    }

    /// Gets the node at the given index path.
    ///
    /// Returns `None` when the path runs out of bounds or tries to descend
    /// through a scalar.
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let mut current = &self.root;
        for &index in path {
            current = match current.value() {
                NodeValue::Mapping(entries) => &entries.get(index)?.value,
                NodeValue::Sequence(items) => items.get(index)?,
                NodeValue::Scalar { .. } => return None,
            };
        }
        Some(current)
    }

    /// Mutable variant of [`Document::node_at`].
    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut current = &mut self.root;
        for &index in path {
            current = match &mut current.value {
                NodeValue::Mapping(entries) => &mut entries.get_mut(index)?.value,
                NodeValue::Sequence(items) => items.get_mut(index)?,
                NodeValue::Scalar { .. } => return None,
            };
        }
        Some(current)
    }

    /// Replaces the scalar payload of the node at `path`, returning the old
    /// payload. `None` when the path does not resolve or the target is not
    /// a scalar.
    pub fn set_scalar(
        &mut self,
        path: &[usize],
        value: &str,
        comment: Option<&str>,
    ) -> Option<String> {
        self.node_at_mut(path)?.set_scalar(value, comment)
    }

    /// Whether any node in this document has been modified since parsing.
    pub fn is_modified(&self) -> bool {
        fn walk(node: &Node) -> bool {
            if node.is_modified() {
                return true;
            }
            match node.value() {
                NodeValue::Mapping(entries) => entries.iter().any(|e| walk(&e.value)),
                NodeValue::Sequence(items) => items.iter().any(walk),
                NodeValue::Scalar { .. } => false,
            }
        }
        walk(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::parse_documents;

    fn single(content: &str) -> Document {
        parse_documents(content, "test.yaml")
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn test_node_at_mapping_then_sequence() {
        let doc = single("items:\n  - a\n  - b\n  - c\n");
        let node = doc.node_at(&[0, 1]).unwrap();
        assert_eq!(node.scalar_value(), Some("b"));
    }

    #[test]
    fn test_node_at_out_of_bounds() {
        let doc = single("items:\n  - a\n");
        assert!(doc.node_at(&[0, 5]).is_none());
        assert!(doc.node_at(&[3]).is_none());
    }

    #[test]
    fn test_node_at_cannot_descend_scalar() {
        let doc = single("name: x\n");
        assert!(doc.node_at(&[0, 0]).is_none());
    }

    #[test]
    fn test_set_scalar_via_path() {
        let mut doc = single("name: x\n");
        let old = doc.set_scalar(&[0], "y", None);
        assert_eq!(old.as_deref(), Some("x"));
        assert_eq!(doc.node_at(&[0]).unwrap().scalar_value(), Some("y"));
        assert!(doc.is_modified());
    }

    #[test]
    fn test_unmutated_document_is_not_modified() {
        let doc = single("a:\n  b: c\n");
        assert!(!doc.is_modified());
    }
}
