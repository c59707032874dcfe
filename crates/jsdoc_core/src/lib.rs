//! jsdoc_core: Core utilities shared by the JSDoc grammar crates.
//!
//! Provides text spans and ranges measured in byte offsets, a line map for
//! presenting those offsets to humans, the bump arena every parse
//! allocates its AST into, and stack growth for deep recursion.

pub mod arena;
pub mod stack;
pub mod text;

// Re-export commonly used types
pub use arena::{alloc_vec_in, DocArena};
pub use stack::ensure_sufficient_stack;
pub use text::{LineAndColumn, LineMap, TextPos, TextRange, TextSpan};
