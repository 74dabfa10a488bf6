//! The legacy dotted key path engine.
//!
//! Syntax: dot-separated identifiers, optional trailing `[N]` per segment,
//! optional leading bare `[N]` when the document root is a sequence.
//! Resolution is column-scoped — see [`resolver`].

pub mod error;
pub mod parser;
pub mod resolver;

pub use error::KeyPathError;
pub use parser::{parse, Segment};
pub use resolver::locate;
