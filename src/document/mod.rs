//! In-memory document model for YAML streams.
//!
//! A byte stream parses into one or more [`tree::Document`]s, each a tree
//! of [`node::Node`]s (scalar, sequence, mapping) carrying source
//! positions, byte spans, and trailing comments. Locators address nodes by
//! [`tree::NodePath`]; mutation happens in place on the owning document.

pub mod node;
pub mod parser;
pub mod tree;

pub use node::{Mark, MappingEntry, Node, NodeValue, ScalarStyle, TextSpan};
pub use parser::parse_documents;
pub use tree::{Document, NodePath};
