//! AST visitor trait for traversing parsed comments and types.
//!
//! Provides both an `AstVisitor` trait for customizable traversal and
//! a `for_each_child` function for generic iteration over a type's children.

use crate::node::*;

/// A visitor that traverses the AST. Implement this trait to perform
/// operations on each node kind. Default implementations walk into children.
pub trait AstVisitor<'a> {
    fn visit_doc_comment(&mut self, node: &DocComment<'a>) {
        for tag in node.tags.iter() {
            self.visit_tag(tag);
        }
    }

    fn visit_tag(&mut self, tag: &JSDocTag<'a>) {
        self.visit_identifier(tag.tag_name());
        match tag {
            JSDocTag::Type(t) => {
                if let Some(te) = t.type_expression {
                    self.visit_type_expression(te);
                }
            }
            JSDocTag::Return(t) => {
                if let Some(te) = t.type_expression {
                    self.visit_type_expression(te);
                }
            }
            JSDocTag::Param(t) => self.visit_param_tag(t),
            JSDocTag::Template(t) => {
                for tp in t.type_parameters.iter() {
                    self.visit_identifier(tp);
                }
            }
            JSDocTag::Typedef(t) => self.visit_typedef_tag(t),
            JSDocTag::Property(t) => self.visit_property_tag(t),
        }
    }

    fn visit_param_tag(&mut self, node: &ParamTag<'a>) {
        if node.is_name_first {
            self.visit_entity_name(&node.name);
        }
        if let Some(te) = node.type_expression {
            self.visit_type_expression(te);
        }
        if !node.is_name_first {
            self.visit_entity_name(&node.name);
        }
    }

    fn visit_typedef_tag(&mut self, node: &TypedefTag<'a>) {
        self.visit_identifier(&node.name);
        if let Some(te) = node.type_expression {
            self.visit_type_expression(te);
        }
        for prop in node.properties.iter() {
            self.visit_identifier(&prop.tag_name);
            self.visit_property_tag(prop);
        }
    }

    fn visit_property_tag(&mut self, node: &PropertyTag<'a>) {
        self.visit_type_expression(node.type_expression);
        self.visit_identifier(&node.name);
    }

    fn visit_type_expression(&mut self, node: &TypeExpression<'a>) {
        self.visit_type_node(node.type_node);
    }

    fn visit_type_node(&mut self, ty: &TypeNode<'a>) {
        match ty {
            TypeNode::TypeReference(n) => {
                self.visit_entity_name(&n.type_name);
                for arg in n.type_arguments.unwrap_or(&[]).iter() {
                    self.visit_type_node(arg);
                }
            }
            TypeNode::RecordType(n) => {
                for member in n.members.iter() {
                    self.visit_record_member(member);
                }
            }
            _ => for_each_child(ty, |child| self.visit_type_node(child)),
        }
    }

    fn visit_record_member(&mut self, node: &RecordMember<'a>) {
        for param in node.parameters.iter() {
            self.visit_type_node(param);
        }
        if let Some(ty) = node.type_node {
            self.visit_type_node(ty);
        }
    }

    fn visit_entity_name(&mut self, name: &EntityName<'a>) {
        match name {
            EntityName::Identifier(id) => self.visit_identifier(id),
            EntityName::QualifiedName(q) => {
                self.visit_entity_name(&q.left);
                self.visit_identifier(&q.right);
            }
        }
    }

    fn visit_identifier(&mut self, _node: &Identifier<'a>) {}
}

/// Call `f` on each direct child type of `node`, in source order.
///
/// Record members are flattened: their parameter and value types are yielded
/// in member order.
pub fn for_each_child<'a>(node: &TypeNode<'a>, mut f: impl FnMut(&TypeNode<'a>)) {
    match node {
        TypeNode::AllType(_) | TypeNode::UnknownType(_) | TypeNode::KeywordType(_) => {}
        TypeNode::NullableType(n) => f(n.type_node),
        TypeNode::NonNullableType(n) => f(n.type_node),
        TypeNode::ThisType(n) => f(n.type_node),
        TypeNode::NewType(n) => f(n.type_node),
        TypeNode::VariadicType(n) => f(n.type_node),
        TypeNode::OptionalType(n) => f(n.type_node),
        TypeNode::ArrayType(n) => f(n.element_type),
        TypeNode::RecordType(n) => {
            for member in n.members.iter() {
                member.parameters.iter().for_each(&mut f);
                if let Some(ty) = member.type_node {
                    f(ty);
                }
            }
        }
        TypeNode::UnionType(n) => n.types.iter().for_each(f),
        TypeNode::TupleType(n) => n.elements.iter().for_each(f),
        TypeNode::FunctionType(n) => {
            if let Some(this) = n.this_type {
                f(this);
            }
            if let Some(target) = n.new_target {
                f(target);
            }
            n.parameters.iter().for_each(&mut f);
            if let Some(ret) = n.return_type {
                f(ret);
            }
        }
        TypeNode::TypeReference(n) => {
            if let Some(args) = n.type_arguments {
                args.iter().for_each(f);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax_kind::SyntaxKind;
    use crate::types::TypeKeyword;
    use bumpalo::Bump;

    struct KindCollector(Vec<SyntaxKind>);

    impl<'a> AstVisitor<'a> for KindCollector {
        fn visit_type_node(&mut self, ty: &TypeNode<'a>) {
            self.0.push(ty.kind());
            for_each_child(ty, |child| self.visit_type_node(child));
        }
    }

    #[test]
    fn test_visitor_walks_tuple_in_order() {
        let arena = Bump::new();
        let elements = arena.alloc_slice_fill_with(2, |i| {
            TypeNode::KeywordType(KeywordTypeNode {
                data: NodeData::new(SyntaxKind::KeywordType, 2 + i as u32 * 6, 6 + i as u32 * 6),
                keyword: if i == 0 { TypeKeyword::Null } else { TypeKeyword::Var },
            })
        });
        let tuple = TypeNode::TupleType(TupleTypeNode {
            data: NodeData::new(SyntaxKind::TupleType, 1, 12),
            elements,
        });

        let mut collector = KindCollector(Vec::new());
        collector.visit_type_node(&tuple);
        assert_eq!(
            collector.0,
            vec![SyntaxKind::TupleType, SyntaxKind::KeywordType, SyntaxKind::KeywordType]
        );
    }
}
