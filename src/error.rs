//! The engine error taxonomy.
//!
//! A single typed `Error` enum spans the whole crate: configuration
//! problems, path-parse failures, document-parse failures, missing keys,
//! non-scalar targets, I/O errors, and an aggregate that carries several
//! of the above for multi-file operations.

use std::fmt;

/// A convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the yamlpatch engine.
#[derive(Debug)]
pub enum Error {
    /// The resource specification is invalid or internally inconsistent.
    Configuration {
        message: String,
    },
    /// A path expression could not be parsed.
    PathParse {
        expression: String,
        message: String,
    },
    /// A YAML document could not be parsed.
    DocumentParse {
        file: String,
        message: String,
    },
    /// The addressed key was not found.
    KeyNotFound {
        file: String,
        key: String,
    },
    /// The addressed node exists but is not a scalar.
    NotScalar {
        file: String,
        key: String,
    },
    /// An I/O error occurred while reading or writing a file.
    Io {
        path: String,
        source: std::io::Error,
    },
    /// Several errors gathered from a multi-file operation.
    Aggregate {
        errors: Vec<Error>,
    },
}

impl Error {
    /// Construct an [`Error::Io`] from a path and the underlying I/O error.
    pub fn io(path: String, source: std::io::Error) -> Self {
        Error::Io { path, source }
    }

    /// Returns `true` if this error is a [`Error::KeyNotFound`].
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Error::KeyNotFound { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration { message } => {
                write!(f, "configuration error: {}", message)
            }
            Error::PathParse {
                expression,
                message,
            } => write!(
                f,
                "failed to parse path '{}': {}",
                expression, message
            ),
            Error::DocumentParse { file, message } => {
                write!(f, "failed to parse '{}': {}", file, message)
            }
            Error::KeyNotFound { file, key } => {
                write!(f, "key '{}' not found in '{}'", key, file)
            }
            Error::NotScalar { file, key } => {
                write!(f, "key '{}' in '{}' is not a scalar", key, file)
            }
            Error::Io { path, source } => {
                write!(f, "i/o error on '{}': {}", path, source)
            }
            Error::Aggregate { errors } => {
                let joined = errors
                    .iter()
                    .map(|err| err.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                write!(f, "{}", joined)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
