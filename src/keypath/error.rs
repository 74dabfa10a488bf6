//! Error types for dotted key path parsing.

use std::fmt;

/// Errors raised while parsing a dotted key path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPathError {
    /// The expression was empty.
    Empty,
    /// A `.`-separated segment was empty (e.g. `a..b`).
    EmptySegment { expression: String },
    /// A segment carried an unbalanced `[` / `]` pair.
    Unbalanced { fragment: String },
    /// A trailing index was not a non-negative integer.
    BadIndex { fragment: String },
}

impl fmt::Display for KeyPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPathError::Empty => write!(f, "empty key path"),
            KeyPathError::EmptySegment { expression } => {
                write!(f, "empty segment in key path {:?}", expression)
            }
            KeyPathError::Unbalanced { fragment } => {
                write!(f, "unbalanced brackets in segment {:?}", fragment)
            }
            KeyPathError::BadIndex { fragment } => {
                write!(f, "invalid index in segment {:?}", fragment)
            }
        }
    }
}

impl std::error::Error for KeyPathError {}
