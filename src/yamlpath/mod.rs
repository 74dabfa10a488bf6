//! yamlpath query parser and evaluator for structural YAML search.
//!
//! The more expressive of the two path engines, used when a query needs
//! wildcards, filters, or bulk matching.
//!
//! # Supported Syntax
//!
//! - `$` - Root node
//! - `.property` - Named property access
//! - `['property']` - Bracket notation (keys containing dots)
//! - `[index]` - Array index (supports negative indices)
//! - `[*]` or `.*` - All children (wildcard)
//! - `..property` or `..` - Recursive descent
//! - `[start:end]` - Array slicing
//! - `['prop1','prop2']` - Multiple properties
//! - `[?(@.field == 'literal')]` - Equality filter on candidate children
//!
//! # Examples
//!
//! ```text
//! $.repos[?(@.repository == 'website')].owner
//! $.agents[*].image
//! $..version
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use ast::{FilterExpr, PathSegment, YamlPath};
pub use error::YamlPathError;
pub use evaluator::Evaluator;
pub use parser::Parser;
