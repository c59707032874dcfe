//! SyntaxKind enum - every token and node kind of the JSDoc grammars.
//!
//! Token kinds come first, then keywords, then type nodes, then doc comment
//! nodes. The range helpers below rely on that ordering.

use serde::Serialize;

/// The kind of a token or AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    Unknown = 0,
    EndOfFileToken = 1,

    // Literals
    NumericLiteral = 2,
    StringLiteral = 3,

    // Punctuation
    OpenBraceToken = 4,
    CloseBraceToken = 5,
    OpenParenToken = 6,
    CloseParenToken = 7,
    OpenBracketToken = 8,
    CloseBracketToken = 9,
    DotToken = 10,
    DotDotDotToken = 11,
    CommaToken = 12,
    LessThanToken = 13,
    GreaterThanToken = 14,
    EqualsGreaterThanToken = 15,
    AsteriskToken = 16,
    ExclamationToken = 17,
    QuestionToken = 18,
    ColonToken = 19,
    EqualsToken = 20,
    BarToken = 21,
    AtToken = 22,

    // Identifiers
    Identifier = 23,

    // Keywords
    FunctionKeyword = 24,
    NewKeyword = 25,
    NullKeyword = 26,
    ThisKeyword = 27,
    TypeOfKeyword = 28,
    UndefinedKeyword = 29,
    VarKeyword = 30,

    // ========================================================================
    // Names
    // ========================================================================
    QualifiedName = 40,

    // ========================================================================
    // Type nodes
    // ========================================================================
    TypeExpression = 50,
    AllType = 51,
    UnknownType = 52,
    NullableType = 53,
    NonNullableType = 54,
    RecordType = 55,
    RecordMember = 56,
    UnionType = 57,
    FunctionType = 58,
    ThisType = 59,
    NewType = 60,
    VariadicType = 61,
    OptionalType = 62,
    TypeReference = 63,
    ArrayType = 64,
    TupleType = 65,
    KeywordType = 66,

    // ========================================================================
    // Doc comment nodes
    // ========================================================================
    DocComment = 80,
    TypeTag = 81,
    ReturnTag = 82,
    ParamTag = 83,
    TemplateTag = 84,
    TypedefTag = 85,
    PropertyTag = 86,
}

impl SyntaxKind {
    /// Whether this kind represents a keyword.
    #[inline]
    pub fn is_keyword(self) -> bool {
        let v = self as u16;
        v >= SyntaxKind::FunctionKeyword as u16 && v <= SyntaxKind::VarKeyword as u16
    }

    /// Whether this kind represents a punctuation token.
    #[inline]
    pub fn is_punctuation(self) -> bool {
        let v = self as u16;
        v >= SyntaxKind::OpenBraceToken as u16 && v <= SyntaxKind::AtToken as u16
    }

    #[inline]
    pub fn is_literal(self) -> bool {
        matches!(self, SyntaxKind::NumericLiteral | SyntaxKind::StringLiteral)
    }

    /// Whether this kind is an identifier or a keyword, i.e. usable where an
    /// identifier name (not a reserved word check) is expected.
    #[inline]
    pub fn is_identifier_or_keyword(self) -> bool {
        self == SyntaxKind::Identifier || self.is_keyword()
    }

    /// Whether this kind represents a type node.
    #[inline]
    pub fn is_type_node(self) -> bool {
        let v = self as u16;
        v >= SyntaxKind::AllType as u16 && v <= SyntaxKind::KeywordType as u16
    }

    /// Whether this kind represents a doc comment tag.
    #[inline]
    pub fn is_tag(self) -> bool {
        let v = self as u16;
        v >= SyntaxKind::TypeTag as u16 && v <= SyntaxKind::PropertyTag as u16
    }

    /// Get the keyword kind for an identifier string, if it's a keyword.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        match text {
            "function" => Some(SyntaxKind::FunctionKeyword),
            "new" => Some(SyntaxKind::NewKeyword),
            "null" => Some(SyntaxKind::NullKeyword),
            "this" => Some(SyntaxKind::ThisKeyword),
            "typeof" => Some(SyntaxKind::TypeOfKeyword),
            "undefined" => Some(SyntaxKind::UndefinedKeyword),
            "var" => Some(SyntaxKind::VarKeyword),
            _ => None,
        }
    }

    /// Get the text of a keyword token.
    pub fn keyword_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::FunctionKeyword => Some("function"),
            SyntaxKind::NewKeyword => Some("new"),
            SyntaxKind::NullKeyword => Some("null"),
            SyntaxKind::ThisKeyword => Some("this"),
            SyntaxKind::TypeOfKeyword => Some("typeof"),
            SyntaxKind::UndefinedKeyword => Some("undefined"),
            SyntaxKind::VarKeyword => Some("var"),
            _ => None,
        }
    }

    /// Get the text of a punctuation token.
    pub fn punctuation_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::OpenBraceToken => Some("{"),
            SyntaxKind::CloseBraceToken => Some("}"),
            SyntaxKind::OpenParenToken => Some("("),
            SyntaxKind::CloseParenToken => Some(")"),
            SyntaxKind::OpenBracketToken => Some("["),
            SyntaxKind::CloseBracketToken => Some("]"),
            SyntaxKind::DotToken => Some("."),
            SyntaxKind::DotDotDotToken => Some("..."),
            SyntaxKind::CommaToken => Some(","),
            SyntaxKind::LessThanToken => Some("<"),
            SyntaxKind::GreaterThanToken => Some(">"),
            SyntaxKind::EqualsGreaterThanToken => Some("=>"),
            SyntaxKind::AsteriskToken => Some("*"),
            SyntaxKind::ExclamationToken => Some("!"),
            SyntaxKind::QuestionToken => Some("?"),
            SyntaxKind::ColonToken => Some(":"),
            SyntaxKind::EqualsToken => Some("="),
            SyntaxKind::BarToken => Some("|"),
            SyntaxKind::AtToken => Some("@"),
            _ => None,
        }
    }

    /// The source text of a fixed-text token, for "'{0}' expected" messages.
    pub fn token_text(self) -> &'static str {
        self.punctuation_text()
            .or_else(|| self.keyword_text())
            .unwrap_or(match self {
                SyntaxKind::Identifier => "identifier",
                SyntaxKind::EndOfFileToken => "end of input",
                _ => "token",
            })
    }
}
