//! Abstract syntax tree types for yamlpath expressions.

/// An equality filter applied to candidate children:
/// `[?(@.field == 'literal')]`. The field may be a dotted chain.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpr {
    /// Field chain resolved inside each candidate (`@.a.b` -> `["a","b"]`).
    pub field: Vec<String>,
    /// Literal the field's scalar value must equal.
    pub value: String,
}

/// A segment in a yamlpath expression.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// Root node ($)
    Root,
    /// Named child (.property or ['property'])
    Child(String),
    /// Array index ([0], [-1])
    Index(isize),
    /// Wildcard (* or [*]) - all children
    Wildcard,
    /// Recursive descent (.. or ..property)
    RecursiveDescent(Option<String>),
    /// Array slice ([start:end])
    Slice(Option<isize>, Option<isize>),
    /// Multiple properties (['prop1','prop2'])
    MultiProperty(Vec<String>),
    /// Equality filter ([?(@.field == 'literal')])
    Filter(FilterExpr),
}

/// A complete yamlpath expression.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlPath {
    /// Segments that make up the path.
    pub segments: Vec<PathSegment>,
}

impl YamlPath {
    /// Creates a new yamlpath with the given segments.
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}
