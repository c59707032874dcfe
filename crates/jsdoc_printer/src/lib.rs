//! jsdoc_printer: Render parsed JSDoc type expressions back to text.
//!
//! Output is canonical rather than source-preserving: whitespace is
//! normalized, but every node prints in the form it was written in (prefix
//! or postfix modifiers, parenthesized unions), so printing and reparsing a
//! well-formed tree yields the same tree shape.

use jsdoc_ast::node::*;
use jsdoc_ast::syntax_kind::SyntaxKind;
use jsdoc_ast::types::NodeFlags;

/// Print a type node.
pub fn print_type(ty: &TypeNode<'_>) -> String {
    let mut printer = Printer::new();
    printer.print_type_node(ty);
    printer.output
}

/// Print a type expression including its enclosing braces.
pub fn print_type_expression(expr: &TypeExpression<'_>) -> String {
    let mut printer = Printer::new();
    printer.write("{");
    printer.print_type_node(expr.type_node);
    printer.write("}");
    printer.output
}

/// Print the name of a `@param` tag or type reference, e.g. `a.b.c`.
pub fn print_entity_name(name: &EntityName<'_>) -> String {
    let mut printer = Printer::new();
    printer.print_entity_name(name);
    printer.output
}

struct Printer {
    output: String,
}

impl Printer {
    fn new() -> Self {
        Self {
            output: String::with_capacity(64),
        }
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn print_type_node(&mut self, ty: &TypeNode<'_>) {
        match ty {
            TypeNode::AllType(_) => self.write("*"),
            TypeNode::UnknownType(_) => self.write("?"),
            TypeNode::NullableType(n) => self.print_modifier(&n.data, "?", n.type_node),
            TypeNode::NonNullableType(n) => self.print_modifier(&n.data, "!", n.type_node),
            TypeNode::RecordType(n) => {
                self.write("{");
                for (i, member) in n.members.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.print_record_member(member);
                }
                self.write("}");
            }
            TypeNode::UnionType(n) => {
                let parenthesized = n.data.flags.contains(NodeFlags::PARENTHESIZED);
                if parenthesized {
                    self.write("(");
                }
                for (i, t) in n.types.iter().enumerate() {
                    if i > 0 {
                        self.write("|");
                    }
                    self.print_type_node(t);
                }
                if parenthesized {
                    self.write(")");
                }
            }
            TypeNode::FunctionType(n) => {
                self.write("function(");
                let mut first = true;
                if let Some(this) = n.this_type {
                    self.write("this:");
                    self.print_type_node(this);
                    first = false;
                }
                if let Some(target) = n.new_target {
                    if !first {
                        self.write(", ");
                    }
                    self.write("new:");
                    self.print_type_node(target);
                    first = false;
                }
                for param in n.parameters.iter() {
                    if !first {
                        self.write(", ");
                    }
                    self.print_type_node(param);
                    first = false;
                }
                self.write(")");
                if let Some(ret) = n.return_type {
                    self.write(": ");
                    self.print_type_node(ret);
                }
            }
            TypeNode::ThisType(n) => {
                self.write("this:");
                self.print_type_node(n.type_node);
            }
            TypeNode::NewType(n) => {
                self.write("new:");
                self.print_type_node(n.type_node);
            }
            TypeNode::VariadicType(n) => {
                self.write("...");
                self.print_type_node(n.type_node);
            }
            TypeNode::OptionalType(n) => {
                self.print_type_node(n.type_node);
                self.write("=");
            }
            TypeNode::TypeReference(n) => {
                self.print_entity_name(&n.type_name);
                if let Some(args) = n.type_arguments {
                    self.write(".<");
                    self.print_type_list(args);
                    self.write(">");
                }
            }
            TypeNode::ArrayType(n) => {
                self.print_type_node(n.element_type);
                for _ in 0..n.dimensions {
                    self.write("[]");
                }
            }
            TypeNode::TupleType(n) => {
                self.write("[");
                self.print_type_list(n.elements);
                self.write("]");
            }
            TypeNode::KeywordType(n) => self.write(n.keyword.as_str()),
        }
    }

    fn print_modifier(&mut self, data: &NodeData, token: &str, inner: &TypeNode<'_>) {
        if data.flags.contains(NodeFlags::POSTFIX) {
            self.print_type_node(inner);
            self.write(token);
        } else {
            self.write(token);
            self.print_type_node(inner);
        }
    }

    fn print_type_list(&mut self, types: &[TypeNode<'_>]) {
        for (i, t) in types.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.print_type_node(t);
        }
    }

    fn print_record_member(&mut self, member: &RecordMember<'_>) {
        if let Some(name) = &member.name {
            self.print_property_name(name);
        }
        if member.is_call_signature || member.is_method {
            self.write("(");
            self.print_type_list(member.parameters);
            self.write(")");
        }
        if let Some(ty) = member.type_node {
            self.write(": ");
            self.print_type_node(ty);
        }
    }

    fn print_property_name(&mut self, name: &PropertyName<'_>) {
        if name.data.kind == SyntaxKind::StringLiteral {
            // The text keeps its escapes, so only the delimiter needs choosing.
            let quote = if name.text.contains('"') { "'" } else { "\"" };
            self.write(quote);
            self.write(name.text);
            self.write(quote);
        } else {
            self.write(name.text);
        }
    }

    fn print_entity_name(&mut self, name: &EntityName<'_>) {
        match name {
            EntityName::Identifier(id) => self.write(id.text),
            EntityName::QualifiedName(q) => {
                self.print_entity_name(&q.left);
                self.write(".");
                self.write(q.right.text);
            }
        }
    }
}
