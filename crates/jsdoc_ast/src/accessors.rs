//! Uniform accessors over the node enums.

use crate::node::*;
use crate::syntax_kind::SyntaxKind;

impl<'a> TypeNode<'a> {
    /// Helper to get the NodeData from any type node.
    pub fn data(&self) -> &NodeData {
        match self {
            TypeNode::AllType(d) | TypeNode::UnknownType(d) => d,
            TypeNode::NullableType(n) => &n.data,
            TypeNode::NonNullableType(n) => &n.data,
            TypeNode::RecordType(n) => &n.data,
            TypeNode::UnionType(n) => &n.data,
            TypeNode::FunctionType(n) => &n.data,
            TypeNode::ThisType(n) => &n.data,
            TypeNode::NewType(n) => &n.data,
            TypeNode::VariadicType(n) => &n.data,
            TypeNode::OptionalType(n) => &n.data,
            TypeNode::TypeReference(n) => &n.data,
            TypeNode::ArrayType(n) => &n.data,
            TypeNode::TupleType(n) => &n.data,
            TypeNode::KeywordType(n) => &n.data,
        }
    }

    pub fn data_mut(&mut self) -> &mut NodeData {
        match self {
            TypeNode::AllType(d) | TypeNode::UnknownType(d) => d,
            TypeNode::NullableType(n) => &mut n.data,
            TypeNode::NonNullableType(n) => &mut n.data,
            TypeNode::RecordType(n) => &mut n.data,
            TypeNode::UnionType(n) => &mut n.data,
            TypeNode::FunctionType(n) => &mut n.data,
            TypeNode::ThisType(n) => &mut n.data,
            TypeNode::NewType(n) => &mut n.data,
            TypeNode::VariadicType(n) => &mut n.data,
            TypeNode::OptionalType(n) => &mut n.data,
            TypeNode::TypeReference(n) => &mut n.data,
            TypeNode::ArrayType(n) => &mut n.data,
            TypeNode::TupleType(n) => &mut n.data,
            TypeNode::KeywordType(n) => &mut n.data,
        }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    /// Whether this node or any node below it was built during error recovery.
    pub fn contains_error(&self) -> bool {
        if self.data().has_error() {
            return true;
        }
        let mut found = false;
        crate::visitor::for_each_child(self, |child| {
            found = found || child.contains_error();
        });
        found
    }
}

impl<'a> JSDocTag<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            JSDocTag::Type(t) => &t.data,
            JSDocTag::Return(t) => &t.data,
            JSDocTag::Param(t) => &t.data,
            JSDocTag::Template(t) => &t.data,
            JSDocTag::Typedef(t) => &t.data,
            JSDocTag::Property(t) => &t.data,
        }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    /// The tag name as written, without the `@`.
    pub fn tag_name(&self) -> &Identifier<'a> {
        match self {
            JSDocTag::Type(t) => &t.tag_name,
            JSDocTag::Return(t) => &t.tag_name,
            JSDocTag::Param(t) => &t.tag_name,
            JSDocTag::Template(t) => &t.tag_name,
            JSDocTag::Typedef(t) => &t.tag_name,
            JSDocTag::Property(t) => &t.tag_name,
        }
    }

    /// The type expression attached directly to this tag, if any.
    pub fn type_expression(&self) -> Option<&TypeExpression<'a>> {
        match self {
            JSDocTag::Type(t) => t.type_expression,
            JSDocTag::Return(t) => t.type_expression,
            JSDocTag::Param(t) => t.type_expression,
            JSDocTag::Template(_) => None,
            JSDocTag::Typedef(t) => t.type_expression,
            JSDocTag::Property(t) => Some(t.type_expression),
        }
    }
}

impl<'a> EntityName<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            EntityName::Identifier(id) => &id.data,
            EntityName::QualifiedName(q) => &q.data,
        }
    }

    /// The full dotted text, e.g. `a.b.c`.
    pub fn text(&self) -> String {
        match self {
            EntityName::Identifier(id) => id.text.to_string(),
            EntityName::QualifiedName(q) => format!("{}.{}", q.left.text(), q.right.text),
        }
    }

    /// The rightmost identifier.
    pub fn last(&self) -> &Identifier<'a> {
        match self {
            EntityName::Identifier(id) => id,
            EntityName::QualifiedName(q) => &q.right,
        }
    }
}

impl<'a> DocComment<'a> {
    /// Tags of the given kind, in source order.
    pub fn tags_of_kind(&self, kind: SyntaxKind) -> impl Iterator<Item = &JSDocTag<'a>> {
        self.tags.iter().filter(move |t| t.kind() == kind)
    }

    pub fn params(&self) -> impl Iterator<Item = &ParamTag<'a>> {
        self.tags.iter().filter_map(|t| match t {
            JSDocTag::Param(p) => Some(p),
            _ => None,
        })
    }
}
