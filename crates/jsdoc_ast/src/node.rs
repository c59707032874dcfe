//! AST node definitions for JSDoc type expressions and doc comments.
//!
//! Nodes are built bottom-up by the parsers and allocated in a bump arena;
//! children are referenced through `&'a` pointers and arena slices. Nothing
//! is mutated after construction.
//!
//! Every node serializes (via serde) to a map with `kind`, `pos`, `end`,
//! `flags` when non-empty, and its fields, which gives external tools a stable
//! JSON shape to snapshot.

use crate::syntax_kind::SyntaxKind;
use crate::types::*;
use jsdoc_core::text::TextRange;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

// ============================================================================
// Core Node Wrapper
// ============================================================================

/// Common data shared by all AST nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeData {
    pub kind: SyntaxKind,
    /// Source range, from the first consumed token to the last.
    pub range: TextRange,
    pub flags: NodeFlags,
}

impl NodeData {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Self {
        Self {
            kind,
            range: TextRange::new(pos, end),
            flags: NodeFlags::NONE,
        }
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub fn pos(&self) -> u32 {
        self.range.pos
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.range.end
    }

    #[inline]
    pub fn has_error(&self) -> bool {
        self.flags.contains(NodeFlags::THIS_NODE_HAS_ERROR)
    }
}

impl Serialize for NodeData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.flags.is_empty() { 3 } else { 4 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("kind", &self.kind)?;
        map.serialize_entry("pos", &self.range.pos)?;
        map.serialize_entry("end", &self.range.end)?;
        if !self.flags.is_empty() {
            map.serialize_entry("flags", &self.flags.bits())?;
        }
        map.end()
    }
}

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

/// An optional arena-allocated node.
pub type OptionalNode<'a, T> = Option<&'a T>;

fn is_empty_list<T>(list: &NodeList<'_, T>) -> bool {
    list.is_empty()
}

// ============================================================================
// Names
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Identifier<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub text: &'a str,
}

/// A dotted name such as `a.b.c`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EntityName<'a> {
    Identifier(Identifier<'a>),
    QualifiedName(&'a QualifiedName<'a>),
}

#[derive(Debug, Clone, Serialize)]
pub struct QualifiedName<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub left: EntityName<'a>,
    pub right: Identifier<'a>,
}

/// A record member name: an identifier (keywords allowed), or a string or
/// numeric literal. `data.kind` tells which; `text` holds the literal's value
/// without quotes.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyName<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub text: &'a str,
}

// ============================================================================
// Type Nodes
// ============================================================================

/// A `{...}` type expression; the range includes both braces.
#[derive(Debug, Serialize)]
pub struct TypeExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(rename = "type")]
    pub type_node: &'a TypeNode<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TypeNode<'a> {
    /// `*`
    AllType(NodeData),
    /// `?`
    UnknownType(NodeData),
    NullableType(NullableTypeNode<'a>),
    NonNullableType(NonNullableTypeNode<'a>),
    RecordType(RecordTypeNode<'a>),
    UnionType(UnionTypeNode<'a>),
    FunctionType(FunctionTypeNode<'a>),
    ThisType(ThisTypeNode<'a>),
    NewType(NewTypeNode<'a>),
    VariadicType(VariadicTypeNode<'a>),
    OptionalType(OptionalTypeNode<'a>),
    TypeReference(TypeReferenceNode<'a>),
    ArrayType(ArrayTypeNode<'a>),
    TupleType(TupleTypeNode<'a>),
    KeywordType(KeywordTypeNode),
}

/// `?T` or, with [`NodeFlags::POSTFIX`], `T?`.
#[derive(Debug, Serialize)]
pub struct NullableTypeNode<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(rename = "type")]
    pub type_node: &'a TypeNode<'a>,
}

/// `!T` or, with [`NodeFlags::POSTFIX`], `T!`.
#[derive(Debug, Serialize)]
pub struct NonNullableTypeNode<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(rename = "type")]
    pub type_node: &'a TypeNode<'a>,
}

/// `{{a: T, b, (): R, m(): R}}`
#[derive(Debug, Serialize)]
pub struct RecordTypeNode<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub members: NodeList<'a, RecordMember<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RecordMember<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    /// Absent only for call signatures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<PropertyName<'a>>,
    /// Parameters of a call signature or method; empty for properties.
    #[serde(skip_serializing_if = "is_empty_list")]
    pub parameters: NodeList<'a, TypeNode<'a>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_node: OptionalNode<'a, TypeNode<'a>>,
    pub is_call_signature: bool,
    pub is_method: bool,
}

/// `(A|B)` (flagged [`NodeFlags::PARENTHESIZED`]) or top-level `A|B`.
#[derive(Debug, Serialize)]
pub struct UnionTypeNode<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub types: NodeList<'a, TypeNode<'a>>,
}

/// `function(this:T, A, ...B): R`
#[derive(Debug, Serialize)]
pub struct FunctionTypeNode<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    /// The type after a leading `this:`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub this_type: OptionalNode<'a, TypeNode<'a>>,
    /// The type after a leading `new:`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_target: OptionalNode<'a, TypeNode<'a>>,
    pub parameters: NodeList<'a, TypeNode<'a>>,
    /// The last entry of `parameters` is a [`TypeNode::VariadicType`].
    pub is_variadic_last: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: OptionalNode<'a, TypeNode<'a>>,
}

/// `this:T`
#[derive(Debug, Serialize)]
pub struct ThisTypeNode<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(rename = "type")]
    pub type_node: &'a TypeNode<'a>,
}

/// `new:T`
#[derive(Debug, Serialize)]
pub struct NewTypeNode<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(rename = "type")]
    pub type_node: &'a TypeNode<'a>,
}

/// `...T`
#[derive(Debug, Serialize)]
pub struct VariadicTypeNode<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(rename = "type")]
    pub type_node: &'a TypeNode<'a>,
}

/// `T=`
#[derive(Debug, Serialize)]
pub struct OptionalTypeNode<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(rename = "type")]
    pub type_node: &'a TypeNode<'a>,
}

/// `a.b.<T, U>`
#[derive(Debug, Serialize)]
pub struct TypeReferenceNode<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub type_name: EntityName<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_arguments: Option<NodeList<'a, TypeNode<'a>>>,
}

/// `T[][]`, one node per run of brackets.
#[derive(Debug, Serialize)]
pub struct ArrayTypeNode<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub element_type: &'a TypeNode<'a>,
    pub dimensions: u32,
}

/// `[A, B]`
#[derive(Debug, Serialize)]
pub struct TupleTypeNode<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub elements: NodeList<'a, TypeNode<'a>>,
}

/// `var`, `null` or `undefined`.
#[derive(Debug, Serialize)]
pub struct KeywordTypeNode {
    #[serde(flatten)]
    pub data: NodeData,
    pub keyword: TypeKeyword,
}

// ============================================================================
// Doc Comments
// ============================================================================

/// A parsed `/** ... */` comment.
#[derive(Debug, Serialize)]
pub struct DocComment<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    /// Free text before the first tag, decoration stripped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preamble: Option<&'a str>,
    pub tags: NodeList<'a, JSDocTag<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum JSDocTag<'a> {
    Type(TypeTag<'a>),
    Return(ReturnTag<'a>),
    Param(ParamTag<'a>),
    Template(TemplateTag<'a>),
    Typedef(TypedefTag<'a>),
    Property(PropertyTag<'a>),
}

/// `@type {T} description`
#[derive(Debug, Serialize)]
pub struct TypeTag<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub tag_name: Identifier<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_expression: OptionalNode<'a, TypeExpression<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

/// `@return {T} description` / `@returns ...`
#[derive(Debug, Serialize)]
pub struct ReturnTag<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub tag_name: Identifier<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_expression: OptionalNode<'a, TypeExpression<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

/// `@param {T} [name = default] description`
#[derive(Debug, Serialize)]
pub struct ParamTag<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub tag_name: Identifier<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_expression: OptionalNode<'a, TypeExpression<'a>>,
    pub name: EntityName<'a>,
    /// The name was written in square brackets, marking it optional.
    pub is_bracketed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    /// The name was written before the type (`@param name {T}`).
    pub is_name_first: bool,
}

/// `@template K, V description`
#[derive(Debug, Serialize)]
pub struct TemplateTag<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub tag_name: Identifier<'a>,
    pub type_parameters: NodeList<'a, Identifier<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

/// `@typedef name` with its `@type` and `@property` children.
///
/// The range runs from the `@typedef` marker to the end of the last child.
#[derive(Debug, Serialize)]
pub struct TypedefTag<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub tag_name: Identifier<'a>,
    pub name: Identifier<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_expression: OptionalNode<'a, TypeExpression<'a>>,
    /// Text after the name, or after a child `@type` when the typedef line
    /// has none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub properties: NodeList<'a, PropertyTag<'a>>,
}

/// `@property {T} name description`
#[derive(Debug, Serialize)]
pub struct PropertyTag<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub tag_name: Identifier<'a>,
    pub type_expression: &'a TypeExpression<'a>,
    pub name: Identifier<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}
