//! jsdoc_parser: Recursive descent parsers for JSDoc type expressions and
//! doc comment tags.
//!
//! Both parsers allocate their AST into a caller-provided bump arena and
//! report malformed input as diagnostics, never as `Err` or panics. A parse
//! succeeded when its diagnostics are empty.
//!
//! ```
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let result = jsdoc_parser::parse_type_expression(&arena, "{Array.<string>}", 0);
//! assert!(result.is_ok());
//! ```

mod doc_comment;
mod options;
mod type_expression;

use bumpalo::Bump;
use jsdoc_ast::node::{DocComment, TypeExpression};
use jsdoc_core::text::TextSpan;
use jsdoc_diagnostics::{messages, DiagnosticCollection};
use tracing::{debug, debug_span};

pub use doc_comment::{find_doc_comments, is_doc_comment, TagKind, TagParser};
pub use options::{ParseOptions, DEFAULT_MAX_NESTING_DEPTH};
pub use type_expression::TypeExpressionParser;

/// The outcome of parsing a standalone type expression.
#[derive(Debug)]
pub struct TypeExpressionResult<'a> {
    /// Absent only when the text does not start with `{`.
    pub type_expression: Option<&'a TypeExpression<'a>>,
    pub diagnostics: DiagnosticCollection,
}

impl<'a> TypeExpressionResult<'a> {
    /// A node was produced and nothing was reported.
    pub fn is_ok(&self) -> bool {
        self.type_expression.is_some() && self.diagnostics.is_empty()
    }
}

/// The outcome of parsing one doc comment.
#[derive(Debug)]
pub struct DocCommentResult<'a> {
    pub comment: &'a DocComment<'a>,
    pub diagnostics: DiagnosticCollection,
}

impl<'a> DocCommentResult<'a> {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parse the type expression starting at `text[start]`, which must be `{`.
/// Everything after the closing `}` must be whitespace. A `start` past the
/// end of `text` or inside a multi-byte character reports `'{' expected.`
pub fn parse_type_expression<'a>(arena: &'a Bump, text: &'a str, start: usize) -> TypeExpressionResult<'a> {
    parse_type_expression_with(&ParseOptions::default(), arena, text, start)
}

pub fn parse_type_expression_with<'a>(
    options: &ParseOptions,
    arena: &'a Bump,
    text: &'a str,
    start: usize,
) -> TypeExpressionResult<'a> {
    let _span = debug_span!("parse_type_expression", start, len = text.len().saturating_sub(start)).entered();
    if !text.is_char_boundary(start) {
        let pos = (0..=start.min(text.len()))
            .rev()
            .find(|&i| text.is_char_boundary(i))
            .unwrap_or(0);
        let mut diagnostics = DiagnosticCollection::new();
        diagnostics.report(TextSpan::new(pos as u32, 0), &messages::_0_EXPECTED, &["{"]);
        return TypeExpressionResult {
            type_expression: None,
            diagnostics,
        };
    }
    let mut parser = TypeExpressionParser::new(arena, text, start, text.len(), options);
    let type_expression = parser.parse_type_expression();
    if type_expression.is_some() {
        parser.expect_end_of_input();
    }
    let (_, diagnostics) = parser.finish();
    debug!(diagnostics = diagnostics.len(), "parsed type expression");
    TypeExpressionResult {
        type_expression,
        diagnostics,
    }
}

/// Parse the doc comment at `text[start..start + length]`, which should span
/// a whole `/** ... */` comment. Returns `None` when it does not.
pub fn parse_doc_comment<'a>(
    arena: &'a Bump,
    text: &'a str,
    start: usize,
    length: usize,
) -> Option<DocCommentResult<'a>> {
    parse_doc_comment_with(&ParseOptions::default(), arena, text, start, length)
}

pub fn parse_doc_comment_with<'a>(
    options: &ParseOptions,
    arena: &'a Bump,
    text: &'a str,
    start: usize,
    length: usize,
) -> Option<DocCommentResult<'a>> {
    let _span = debug_span!("parse_doc_comment", start, length).entered();
    let mut parser = TagParser::new(arena, text, options);
    let comment = parser.parse(start, length)?;
    let diagnostics = parser.finish();
    debug!(tags = comment.tags.len(), diagnostics = diagnostics.len(), "parsed doc comment");
    Some(DocCommentResult { comment, diagnostics })
}
