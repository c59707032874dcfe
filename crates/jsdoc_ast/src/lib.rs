//! jsdoc_ast: Syntax tree definitions for JSDoc type expressions and doc comments.
//!
//! This crate defines the `SyntaxKind` enum, node and token flags, the node
//! structs the parsers build, and a visitor for walking finished trees.

pub mod accessors;
pub mod node;
pub mod syntax_kind;
pub mod types;
pub mod visitor;

// Re-export key types
pub use node::*;
pub use syntax_kind::SyntaxKind;
pub use types::*;
