//! jsdoc_scanner: Tokenizer for JSDoc type expressions.
//!
//! Produces tokens lazily from a cursor into the source text. The scanner
//! knows nothing of the type grammar; it only classifies characters into
//! punctuation, keywords, identifiers and literals, and supports one-token
//! lookahead plus checkpoint/restore for speculative parsing.

pub mod char_codes;
mod scanner;
mod token;

pub use scanner::{Scanner, ScannerState};
pub use token::TokenInfo;
