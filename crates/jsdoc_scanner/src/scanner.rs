//! The type expression scanner.
//!
//! Converts the text of a `{...}` type expression into tokens on demand. The
//! scanner works on byte offsets into the caller's buffer and can be bounded
//! to a sub-range of it, so a type embedded in a doc comment is scanned in
//! place without copying.

use crate::char_codes::*;
use crate::token::TokenInfo;
use jsdoc_ast::syntax_kind::SyntaxKind;
use jsdoc_ast::types::TokenFlags;
use jsdoc_core::text::TextSpan;
use jsdoc_diagnostics::{messages, DiagnosticCollection};

/// Saved scanner state for lookahead.
#[derive(Debug, Clone, Copy)]
pub struct ScannerState {
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_flags: TokenFlags,
    diagnostic_count: usize,
}

/// The scanner converts type expression text into tokens.
pub struct Scanner<'s> {
    /// The whole source buffer; offsets are absolute into it.
    text: &'s str,
    /// Current position in the text.
    pos: usize,
    /// Scanning stops here (exclusive).
    end: usize,
    /// Start of the current token (after leading trivia).
    token_start: usize,
    /// The current token kind.
    token: SyntaxKind,
    /// Token flags for the current token.
    token_flags: TokenFlags,
    /// Whether a leading `*` on a continuation line is trivia.
    skip_comment_decoration: bool,
    /// Accumulated diagnostics.
    diagnostics: DiagnosticCollection,
}

impl<'s> Scanner<'s> {
    /// Create a new scanner over the whole of `text`.
    pub fn new(text: &'s str) -> Self {
        Self::with_range(text, 0, text.len())
    }

    /// Create a scanner over `text[start..end]`, reporting absolute offsets.
    pub fn with_range(text: &'s str, start: usize, end: usize) -> Self {
        let end = end.min(text.len());
        let start = start.min(end);
        Self {
            text,
            pos: start,
            end,
            token_start: start,
            token: SyntaxKind::Unknown,
            token_flags: TokenFlags::NONE,
            skip_comment_decoration: false,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    /// Treat a `*` that starts a continuation line as trivia, the way doc
    /// comment bodies are decorated.
    pub fn set_skip_comment_decoration(&mut self, skip: bool) {
        self.skip_comment_decoration = skip;
    }

    /// The source buffer this scanner reads.
    pub fn text(&self) -> &'s str {
        self.text
    }

    /// Look ahead: save position, call f, restore position and return result.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.save_state();
        let result = f(self);
        self.restore_state(saved);
        result
    }

    /// Try scanning: save state, call f, if result is None restore state.
    pub fn try_scan<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let saved = self.save_state();
        let result = f(self);
        if result.is_none() {
            self.restore_state(saved);
        }
        result
    }

    /// The kind of the token after the current one, without consuming it.
    pub fn peek(&mut self) -> SyntaxKind {
        self.look_ahead(|s| s.scan())
    }

    /// Get the current token kind.
    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// The raw source text of the current token.
    #[inline]
    pub fn token_text(&self) -> &'s str {
        &self.text[self.token_start..self.pos]
    }

    /// The value of the current token: string literals lose their quotes,
    /// every other token is its raw text.
    pub fn token_value(&self) -> &'s str {
        let raw = self.token_text();
        if self.token == SyntaxKind::StringLiteral && raw.len() >= 2 {
            let closed = !self.token_flags.contains(TokenFlags::UNTERMINATED);
            &raw[1..if closed { raw.len() - 1 } else { raw.len() }]
        } else {
            raw
        }
    }

    /// Get the start position of the current token (after trivia).
    #[inline]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Get the current position (end of current token).
    #[inline]
    pub fn token_end(&self) -> usize {
        self.pos
    }

    /// Where scanning stops.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline]
    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    /// Whether the current token was preceded by a line break.
    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    /// Take the accumulated diagnostics, leaving an empty collection.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    /// Get a TokenInfo for the current token.
    pub fn token_info(&self) -> TokenInfo<'s> {
        TokenInfo {
            kind: self.token,
            pos: self.token_start as u32,
            end: self.pos as u32,
            text: self.token_text(),
            flags: self.token_flags,
        }
    }

    /// Save the full scanner state for lookahead.
    pub fn save_state(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            token_start: self.token_start,
            token: self.token,
            token_flags: self.token_flags,
            diagnostic_count: self.diagnostics.len(),
        }
    }

    /// Restore the full scanner state from a saved state, dropping any
    /// diagnostics reported since it was saved.
    pub fn restore_state(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.token_start = state.token_start;
        self.token = state.token;
        self.token_flags = state.token_flags;
        self.diagnostics.truncate(state.diagnostic_count);
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Look at the character at the current position without advancing.
    #[inline]
    fn current_char(&self) -> Option<char> {
        if self.pos >= self.end {
            return None;
        }
        self.text[self.pos..self.end].chars().next()
    }

    /// Look at the byte `offset` bytes past the current position.
    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        let i = self.pos + offset;
        if i < self.end {
            Some(self.text.as_bytes()[i])
        } else {
            None
        }
    }

    /// Skip whitespace, setting token_flags for line breaks.
    fn skip_trivia(&mut self) {
        let mut at_line_start = false;
        while let Some(ch) = self.current_char() {
            if is_line_break(ch) {
                self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                at_line_start = true;
                self.pos += ch.len_utf8();
            } else if is_white_space_single_line(ch) {
                self.pos += ch.len_utf8();
            } else if ch == '*'
                && at_line_start
                && self.skip_comment_decoration
                && self.byte_at(1) != Some(b'/')
            {
                at_line_start = false;
                self.pos += 1;
            } else {
                return;
            }
        }
    }

    /// Scan the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.token_flags = TokenFlags::NONE;
        self.skip_trivia();
        self.token_start = self.pos;

        let ch = match self.current_char() {
            Some(ch) => ch,
            None => {
                self.token = SyntaxKind::EndOfFileToken;
                return self.token;
            }
        };

        self.token = match ch {
            '{' => self.single(SyntaxKind::OpenBraceToken),
            '}' => self.single(SyntaxKind::CloseBraceToken),
            '(' => self.single(SyntaxKind::OpenParenToken),
            ')' => self.single(SyntaxKind::CloseParenToken),
            '[' => self.single(SyntaxKind::OpenBracketToken),
            ']' => self.single(SyntaxKind::CloseBracketToken),
            ',' => self.single(SyntaxKind::CommaToken),
            ':' => self.single(SyntaxKind::ColonToken),
            '<' => self.single(SyntaxKind::LessThanToken),
            '>' => self.single(SyntaxKind::GreaterThanToken),
            '|' => self.single(SyntaxKind::BarToken),
            '!' => self.single(SyntaxKind::ExclamationToken),
            '?' => self.single(SyntaxKind::QuestionToken),
            '*' => self.single(SyntaxKind::AsteriskToken),
            '@' => self.single(SyntaxKind::AtToken),
            '=' => {
                if self.byte_at(1) == Some(b'>') {
                    self.pos += 2;
                    SyntaxKind::EqualsGreaterThanToken
                } else {
                    self.single(SyntaxKind::EqualsToken)
                }
            }
            '.' => {
                if self.byte_at(1) == Some(b'.') && self.byte_at(2) == Some(b'.') {
                    self.pos += 3;
                    SyntaxKind::DotDotDotToken
                } else if self.byte_at(1).map_or(false, |b| b.is_ascii_digit()) {
                    self.scan_number()
                } else {
                    self.single(SyntaxKind::DotToken)
                }
            }
            '"' | '\'' => self.scan_string_literal(ch),
            '-' if self.byte_at(1).map_or(false, |b| b.is_ascii_digit()) => {
                self.pos += 1;
                self.scan_number()
            }
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_identifier_start(c) => self.scan_identifier(),
            c => {
                self.pos += c.len_utf8();
                self.diagnostics.report(
                    TextSpan::from_bounds(self.token_start as u32, self.pos as u32),
                    &messages::INVALID_CHARACTER,
                    &[],
                );
                SyntaxKind::Unknown
            }
        };
        self.token
    }

    #[inline]
    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    fn scan_string_literal(&mut self, quote: char) -> SyntaxKind {
        self.pos += 1; // skip opening quote
        loop {
            let ch = match self.current_char() {
                Some(ch) if !is_line_break(ch) => ch,
                _ => {
                    self.diagnostics.report(
                        TextSpan::from_bounds(self.token_start as u32, self.pos as u32),
                        &messages::UNTERMINATED_STRING_LITERAL,
                        &[],
                    );
                    self.token_flags |= TokenFlags::UNTERMINATED;
                    break;
                }
            };
            self.pos += ch.len_utf8();
            if ch == quote {
                break;
            }
            if ch == '\\' {
                if let Some(escaped) = self.current_char() {
                    self.pos += escaped.len_utf8();
                }
            }
        }
        SyntaxKind::StringLiteral
    }

    fn scan_number(&mut self) -> SyntaxKind {
        if self.byte_at(0) == Some(b'0') && matches!(self.byte_at(1), Some(b'x' | b'X')) {
            self.pos += 2;
            self.token_flags |= TokenFlags::HEX_SPECIFIER;
            while self.byte_at(0).map_or(false, |b| b.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            return SyntaxKind::NumericLiteral;
        }

        self.scan_digits();
        if self.byte_at(0) == Some(b'.') && self.byte_at(1).map_or(false, |b| b.is_ascii_digit()) {
            self.pos += 1;
            self.scan_digits();
        }
        if matches!(self.byte_at(0), Some(b'e' | b'E')) {
            let sign = usize::from(matches!(self.byte_at(1), Some(b'+' | b'-')));
            if self.byte_at(1 + sign).map_or(false, |b| b.is_ascii_digit()) {
                self.pos += 1 + sign;
                self.token_flags |= TokenFlags::SCIENTIFIC;
                self.scan_digits();
            }
        }
        SyntaxKind::NumericLiteral
    }

    fn scan_digits(&mut self) {
        while self.byte_at(0).map_or(false, |b| b.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        while let Some(ch) = self.current_char() {
            if !is_identifier_part(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        SyntaxKind::from_keyword(self.token_text()).unwrap_or(SyntaxKind::Identifier)
    }
}
