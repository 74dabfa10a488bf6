//! Error types for yamlpath parsing.

use std::fmt;

/// Errors that can occur while parsing a yamlpath query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YamlPathError {
    /// Unexpected token at a specific position.
    UnexpectedToken {
        position: usize,
        found: String,
        expected: String,
    },
    /// Unexpected end of input.
    UnexpectedEnd { expected: String },
    /// Invalid syntax with description.
    InvalidSyntax { message: String },
}

impl fmt::Display for YamlPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YamlPathError::UnexpectedToken {
                position,
                found,
                expected,
            } => write!(
                f,
                "unexpected token '{}' at position {}, expected {}",
                found, position, expected
            ),
            YamlPathError::UnexpectedEnd { expected } => {
                write!(f, "unexpected end of input, expected {}", expected)
            }
            YamlPathError::InvalidSyntax { message } => {
                write!(f, "invalid yamlpath syntax: {}", message)
            }
        }
    }
}

impl std::error::Error for YamlPathError {}
