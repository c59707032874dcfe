//! Token information produced by the scanner.

use jsdoc_ast::syntax_kind::SyntaxKind;
use jsdoc_ast::types::TokenFlags;

/// A scanned token. `text` borrows the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo<'s> {
    pub kind: SyntaxKind,
    /// Start position in the source text.
    pub pos: u32,
    /// End position in the source text (exclusive).
    pub end: u32,
    /// The raw source text of the token.
    pub text: &'s str,
    pub flags: TokenFlags,
}

impl<'s> TokenInfo<'s> {
    /// The length of this token in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    /// Whether there was a line break before this token.
    pub fn has_preceding_line_break(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }
}
