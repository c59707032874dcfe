//! Flag types for tokens and nodes.

use std::fmt;

bitflags::bitflags! {
    /// Flags for AST nodes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u32 {
        const NONE                 = 0;
        /// A diagnostic was reported while building this node; its shape is
        /// a best-effort recovery.
        const THIS_NODE_HAS_ERROR  = 1 << 0;
        /// The node was written in postfix position (`number?`, `number!`).
        const POSTFIX              = 1 << 1;
        /// The node was written inside parentheses (`(a|b)`).
        const PARENTHESIZED        = 1 << 2;
    }
}

bitflags::bitflags! {
    /// Flags describing a scanned token.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u16 {
        const NONE                 = 0;
        const PRECEDING_LINE_BREAK = 1 << 0;
        const UNTERMINATED         = 1 << 1;
        const SCIENTIFIC           = 1 << 2;
        const HEX_SPECIFIER        = 1 << 3;
    }
}

/// The three keywords that denote types on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKeyword {
    Var,
    Null,
    Undefined,
}

impl TypeKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeKeyword::Var => "var",
            TypeKeyword::Null => "null",
            TypeKeyword::Undefined => "undefined",
        }
    }
}

impl fmt::Display for TypeKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
