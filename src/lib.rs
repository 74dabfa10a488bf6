//! yamlpatch - a declarative locate-and-patch engine for YAML.
//!
//! Given one or more files, a path expression, and a desired value, the
//! engine resolves the addressed node(s) in every sub-document, compares,
//! and rewrites in place, reporting a changed/unchanged/skipped verdict.
//! It backs three operating modes:
//!
//! - **source**: produce the current value of a key as a string;
//! - **condition**: verify that a key holds an expected value (or merely
//!   exists, with `keyonly`), optionally tolerating absent keys across a
//!   file set with `searchpattern`;
//! - **target**: idempotently patch the key to a desired value, with
//!   dry-run support.
//!
//! Two path engines are available behind one [`locator::Locator`]
//! interface: the legacy column-scoped dotted-path resolver
//! ([`keypath`]) and a JSONPath-like query engine with wildcards and
//! equality filters ([`yamlpath`]). The legacy engine re-renders files
//! canonically; the query engine preserves every untouched byte.
//!
//! ```no_run
//! use yamlpatch::resource::{Resource, Spec};
//!
//! let spec = Spec {
//!     file: Some("values.yaml".to_string()),
//!     key: "image.tag".to_string(),
//!     value: Some("1.2.3".to_string()),
//!     ..Spec::default()
//! };
//! let mut resource = Resource::new(spec)?;
//! let result = resource.target(None, None, false)?;
//! println!("{}", result.description);
//! # Ok::<(), yamlpatch::error::Error>(())
//! ```

pub mod document;
pub mod error;
pub mod file;
pub mod keypath;
pub mod locator;
pub mod report;
pub mod resource;
pub mod yamlpath;

pub use error::{Error, Result};
pub use resource::{Resource, Spec};
