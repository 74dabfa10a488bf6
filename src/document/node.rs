//! YAML node representation with positional metadata.
//!
//! Every value parsed from a stream is wrapped in a [`Node`] carrying its
//! source position ([`Mark`]), the byte range it occupies ([`TextSpan`]),
//! its scalar presentation style, and a modification flag. Positions drive
//! the column-scoped legacy locator; spans drive the full-fidelity
//! serializer, which only rewrites the bytes of modified scalars.

use yaml_rust2::scanner::{Marker, TScalarStyle};

/// A position in the original byte stream.
///
/// `line` and `col` are 1-based, matching how YAML tooling reports
/// positions; `offset` is a 0-based byte index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

impl Mark {
    /// Converts a yaml-rust2 marker (0-based line/col) to a `Mark`.
    pub fn from_marker(marker: &Marker) -> Self {
        Self {
            offset: marker.index(),
            line: marker.line() + 1,
            col: marker.col() + 1,
        }
    }
}

impl Default for Mark {
    fn default() -> Self {
        Self {
            offset: 0,
            line: 1,
            col: 1,
        }
    }
}

/// A byte range in the original YAML source (end exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

/// Scalar presentation style, as scanned from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

impl ScalarStyle {
    pub(crate) fn from_scan_style(style: TScalarStyle) -> Self {
        match style {
            TScalarStyle::SingleQuoted => ScalarStyle::SingleQuoted,
            TScalarStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
            TScalarStyle::Literal => ScalarStyle::Literal,
            TScalarStyle::Folded => ScalarStyle::Folded,
            _ => ScalarStyle::Plain,
        }
    }
}

/// One key/value entry of a mapping.
///
/// The key's own position is kept because the legacy locator scopes by key
/// column, not by value column.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingEntry {
    pub key: String,
    pub key_mark: Mark,
    pub value: Node,
}

/// A YAML value without metadata.
///
/// Mapping entries are an ordered `Vec`, never a hash map: key order must
/// survive round-trips, and repeated key names at different columns must
/// stay distinct entries for the column-scoped locator.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Scalar { value: String, style: ScalarStyle },
    Sequence(Vec<Node>),
    Mapping(Vec<MappingEntry>),
}

/// A YAML value wrapped with positional metadata.
///
/// Payload and comment modifications are tracked separately: the fidelity
/// serializer must leave an inherited comment's original bytes (spacing
/// included) untouched when only the value changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) value: NodeValue,
    pub(crate) mark: Mark,
    /// Byte range in the original stream; populated for scalars so the
    /// fidelity serializer can splice replacements.
    pub(crate) span: Option<TextSpan>,
    pub(crate) line_comment: Option<String>,
    pub(crate) value_modified: bool,
    pub(crate) comment_modified: bool,
}

impl Node {
    /// Creates a node at the given position. Freshly parsed nodes are not
    /// modified; mutation happens through [`Node::set_scalar`].
    pub fn new(value: NodeValue, mark: Mark) -> Self {
        Self {
            value,
            mark,
            span: None,
            line_comment: None,
            value_modified: false,
            comment_modified: false,
        }
    }

    pub(crate) fn with_span(mut self, span: TextSpan) -> Self {
        self.span = Some(span);
        self
    }

    pub fn value(&self) -> &NodeValue {
        &self.value
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    pub fn span(&self) -> Option<TextSpan> {
        self.span
    }

    pub fn line_comment(&self) -> Option<&str> {
        self.line_comment.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.value_modified || self.comment_modified
    }

    pub fn is_value_modified(&self) -> bool {
        self.value_modified
    }

    pub fn is_comment_modified(&self) -> bool {
        self.comment_modified
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.value, NodeValue::Scalar { .. })
    }

    /// The scalar payload, or `None` for sequences and mappings.
    pub fn scalar_value(&self) -> Option<&str> {
        match &self.value {
            NodeValue::Scalar { value, .. } => Some(value),
            _ => None,
        }
    }

    /// What kind of node this is, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self.value {
            NodeValue::Scalar { .. } => "scalar",
            NodeValue::Sequence(_) => "sequence",
            NodeValue::Mapping(_) => "mapping",
        }
    }

    /// Overwrites the scalar payload in place, optionally attaching or
    /// replacing the trailing line comment.
    ///
    /// Returns the previous payload, or `None` when the node is not a
    /// scalar (the caller must treat that as a resolution failure, never
    /// stringify a subtree). The node is only flagged modified when the
    /// payload or comment actually changes, so an idempotent write keeps
    /// the fidelity serializer byte-identical.
    pub fn set_scalar(&mut self, new_value: &str, comment: Option<&str>) -> Option<String> {
        let NodeValue::Scalar { value, style } = &mut self.value else {
            return None;
        };
        let old = value.clone();
        if old != new_value {
            *value = new_value.to_string();
            *style = ScalarStyle::Plain;
            self.value_modified = true;
        }
        if let Some(comment) = comment {
            if self.line_comment.as_deref() != Some(comment) {
                self.line_comment = Some(comment.to_string());
                self.comment_modified = true;
            }
        }
        Some(old)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(value: &str) -> Node {
        Node::new(
            NodeValue::Scalar {
                value: value.to_string(),
                style: ScalarStyle::Plain,
            },
            Mark::default(),
        )
    }

    #[test]
    fn test_set_scalar_reports_old_value() {
        let mut node = scalar("1.0.0");
        let old = node.set_scalar("2.0.0", None);
        assert_eq!(old.as_deref(), Some("1.0.0"));
        assert_eq!(node.scalar_value(), Some("2.0.0"));
        assert!(node.is_modified());
    }

    #[test]
    fn test_set_scalar_same_value_is_not_a_modification() {
        let mut node = scalar("1.0.0");
        let old = node.set_scalar("1.0.0", None);
        assert_eq!(old.as_deref(), Some("1.0.0"));
        assert!(!node.is_modified());
    }

    #[test]
    fn test_set_scalar_attaching_comment_marks_modified() {
        let mut node = scalar("1.0.0");
        node.set_scalar("1.0.0", Some("managed by yamlpatch"));
        assert!(node.is_modified());
        assert_eq!(node.line_comment(), Some("managed by yamlpatch"));
    }

    #[test]
    fn test_set_scalar_refuses_containers() {
        let mut node = Node::new(NodeValue::Sequence(vec![]), Mark::default());
        assert_eq!(node.set_scalar("x", None), None);
        assert!(!node.is_modified());
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(scalar("x").kind_name(), "scalar");
        assert_eq!(
            Node::new(NodeValue::Mapping(vec![]), Mark::default()).kind_name(),
            "mapping"
        );
    }
}
