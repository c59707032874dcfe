//! jsdoc_diagnostics: Diagnostic messages and the per-parse diagnostics sink.
//!
//! Every malformed construct the parsers meet is reported as a [`Diagnostic`]
//! value pushed into a [`DiagnosticCollection`]; nothing is thrown. Callers
//! decide success purely by whether the collection is empty.
//!
//! Message numbering follows TypeScript's `diagnosticMessages.json` where an
//! equivalent message exists there.

use jsdoc_core::text::TextSpan;
use std::fmt;

/// How severe a diagnostic is. Every malformed construct is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// What went wrong, independent of the message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// An ill-formed construct: unmatched delimiter, missing inner type,
    /// trailing tokens, malformed comma-separated list.
    Syntax,
    /// A tag-level problem: duplicate unique tag, tag missing its required
    /// parts, empty template list.
    Structural,
    /// Host-language type syntax used where only the JSDoc type
    /// sublanguage is valid.
    UnsupportedSyntax,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Syntax => write!(f, "syntax"),
            DiagnosticKind::Structural => write!(f, "structural"),
            DiagnosticKind::UnsupportedSyntax => write!(f, "unsupported syntax"),
        }
    }
}

/// A diagnostic message template with a code, category and kind.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 1003, 1110).
    pub code: u32,
    pub category: DiagnosticCategory,
    pub kind: DiagnosticKind,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Where the diagnostic applies, in the same offset space as the AST.
    pub span: TextSpan,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(span: TextSpan, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            span,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
            kind: message.kind,
        }
    }

    /// The offset of the first byte this diagnostic covers.
    #[inline]
    pub fn start(&self) -> u32 {
        self.span.start
    }

    #[inline]
    pub fn length(&self) -> u32 {
        self.span.length
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}): {} JSDOC{}: {}",
            self.span.start, self.category, self.code, self.message_text
        )
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// The diagnostics accumulated by one parse invocation.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Report `message` at `span`.
    pub fn report(&mut self, span: TextSpan, message: &DiagnosticMessage, args: &[&str]) {
        self.add(Diagnostic::new(span, message, args));
    }

    /// Whether any diagnostic of the given kind was reported.
    pub fn has_kind(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind == kind)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Drop diagnostics reported after the collection had `len` entries.
    /// Used to roll back speculative scans.
    pub fn truncate(&mut self, len: usize) {
        self.diagnostics.truncate(len);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// Sort diagnostics by position, keeping report order for ties.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by_key(|d| d.span.start);
    }
}

impl<'c> IntoIterator for &'c DiagnosticCollection {
    type Item = &'c Diagnostic;
    type IntoIter = std::slice::Iter<'c, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, $kind:ident, $msg:expr) => {
            DiagnosticMessage {
                code: $code,
                category: DiagnosticCategory::Error,
                kind: DiagnosticKind::$kind,
                message: $msg,
            }
        };
    }

    // ========================================================================
    // Scanner errors
    // ========================================================================
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1002, Syntax, "Unterminated string literal.");
    pub const INVALID_CHARACTER: DiagnosticMessage = diag!(1127, Syntax, "Invalid character.");

    // ========================================================================
    // Type expression errors
    // ========================================================================
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = diag!(1003, Syntax, "Identifier expected.");
    pub const _0_EXPECTED: DiagnosticMessage = diag!(1005, Syntax, "'{0}' expected.");
    pub const TRAILING_COMMA_NOT_ALLOWED: DiagnosticMessage = diag!(1009, Syntax, "Trailing comma not allowed.");
    pub const UNEXPECTED_TOKEN: DiagnosticMessage = diag!(1012, Syntax, "Unexpected token.");
    pub const A_REST_PARAMETER_MUST_BE_LAST: DiagnosticMessage = diag!(1014, Syntax, "A rest parameter must be last in a parameter list.");
    pub const TYPE_ARGUMENT_LIST_CANNOT_BE_EMPTY: DiagnosticMessage = diag!(1099, Syntax, "Type argument list cannot be empty.");
    pub const TYPE_EXPECTED: DiagnosticMessage = diag!(1110, Syntax, "Type expected.");
    pub const UNION_TYPE_REQUIRES_AT_LEAST_TWO_TYPES: DiagnosticMessage = diag!(8101, Syntax, "Union types in parentheses require at least two types.");
    pub const TYPE_EXPRESSION_IS_NESTED_TOO_DEEPLY: DiagnosticMessage = diag!(8102, Syntax, "Type expression is nested too deeply.");
    pub const THIS_AND_NEW_MUST_BE_THE_FIRST_PARAMETER: DiagnosticMessage = diag!(8103, Syntax, "'{0}:' may only appear as the first parameter of a function type.");

    // ========================================================================
    // Host-language syntax that JSDoc types do not support
    // ========================================================================
    pub const ARROW_FUNCTION_TYPES_ARE_NOT_SUPPORTED: DiagnosticMessage = diag!(8201, UnsupportedSyntax, "Arrow function types are not supported in JSDoc types; use 'function(...)' instead.");
    pub const CONSTRUCTOR_ARROW_TYPES_ARE_NOT_SUPPORTED: DiagnosticMessage = diag!(8202, UnsupportedSyntax, "Constructor types written with 'new (...) =>' are not supported in JSDoc types; use 'function(new:T, ...)' instead.");
    pub const TYPEOF_TYPES_ARE_NOT_SUPPORTED: DiagnosticMessage = diag!(8203, UnsupportedSyntax, "'typeof' type queries are not supported in JSDoc types.");
    pub const NAMED_PARAMETERS_ARE_NOT_SUPPORTED: DiagnosticMessage = diag!(8204, UnsupportedSyntax, "JSDoc function type parameters cannot be named.");
    pub const TYPE_ARGUMENTS_MUST_FOLLOW_A_DOT: DiagnosticMessage = diag!(8205, UnsupportedSyntax, "Type arguments must be preceded by '.' in JSDoc type references.");

    // ========================================================================
    // Doc comment tag errors
    // ========================================================================
    pub const TYPE_PARAMETER_LIST_CANNOT_BE_EMPTY: DiagnosticMessage = diag!(1098, Structural, "Type parameter list cannot be empty.");
    pub const TAG_0_ALREADY_SPECIFIED: DiagnosticMessage = diag!(1223, Structural, "'{0}' tag already specified.");
    pub const TAG_NAME_EXPECTED: DiagnosticMessage = diag!(8301, Structural, "Identifier expected.");
    pub const TAG_0_REQUIRES_A_TYPE: DiagnosticMessage = diag!(8302, Structural, "'{0}' tag requires a type.");
    pub const TEMPLATE_TRAILING_COMMA: DiagnosticMessage = diag!(8303, Structural, "Trailing comma not allowed.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let msg = format_message("'{0}' expected.", &["}"]);
        assert_eq!(msg, "'}' expected.");
    }

    #[test]
    fn test_format_message_no_args() {
        let msg = format_message("Type expected.", &[]);
        assert_eq!(msg, "Type expected.");
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::new(TextSpan::new(10, 5), &messages::TAG_0_ALREADY_SPECIFIED, &["@type"]);
        let display = format!("{}", diag);
        assert!(display.contains("(10)"));
        assert!(display.contains("JSDOC1223"));
        assert!(display.contains("'@type' tag already specified."));
    }

    #[test]
    fn test_diagnostic_accessors() {
        let diag = Diagnostic::new(TextSpan::new(3, 2), &messages::TYPE_EXPECTED, &[]);
        assert_eq!(diag.start(), 3);
        assert_eq!(diag.length(), 2);
        assert_eq!(diag.code, 1110);
        assert_eq!(diag.kind, DiagnosticKind::Syntax);
        assert_eq!(diag.category, DiagnosticCategory::Error);
    }

    #[test]
    fn test_diagnostic_collection() {
        let mut collection = DiagnosticCollection::new();
        assert!(collection.is_empty());

        collection.report(TextSpan::empty(4), &messages::TYPEOF_TYPES_ARE_NOT_SUPPORTED, &[]);
        assert!(collection.has_kind(DiagnosticKind::UnsupportedSyntax));
        assert!(!collection.has_kind(DiagnosticKind::Structural));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_diagnostic_collection_sort() {
        let mut collection = DiagnosticCollection::new();
        collection.report(TextSpan::new(10, 1), &messages::UNEXPECTED_TOKEN, &[]);
        collection.report(TextSpan::new(5, 1), &messages::IDENTIFIER_EXPECTED, &[]);
        collection.sort();
        let starts: Vec<u32> = collection.iter().map(|d| d.start()).collect();
        assert_eq!(starts, vec![5, 10]);
    }
}
