//! The type expression parser.
//!
//! A recursive descent parser over scanner tokens for the Closure-style type
//! language written between `{` and `}`. Malformed input never aborts the
//! parse: every failure is reported to the diagnostics collection and a
//! best-effort node flagged [`NodeFlags::THIS_NODE_HAS_ERROR`] takes the place
//! of whatever was missing.

use bumpalo::Bump;
use jsdoc_ast::node::*;
use jsdoc_ast::syntax_kind::SyntaxKind;
use jsdoc_ast::types::{NodeFlags, TypeKeyword};
use jsdoc_core::{alloc_vec_in, ensure_sufficient_stack};
use jsdoc_core::text::TextSpan;
use jsdoc_diagnostics::{messages, DiagnosticCollection, DiagnosticMessage};
use jsdoc_scanner::Scanner;
use tracing::trace;

use crate::options::ParseOptions;

/// Parameters shared by function types, arrow recovery and record members.
struct ParameterList<'a> {
    this_type: Option<&'a TypeNode<'a>>,
    new_target: Option<&'a TypeNode<'a>>,
    parameters: NodeList<'a, TypeNode<'a>>,
    is_variadic_last: bool,
    has_error: bool,
}

/// Parses one `{...}` type expression out of a larger buffer.
pub struct TypeExpressionParser<'a> {
    arena: &'a Bump,
    scanner: Scanner<'a>,
    diagnostics: DiagnosticCollection,
    /// End of the last consumed token.
    prev_end: u32,
    depth: u32,
    max_depth: u32,
    /// Set once the nesting limit is hit; everything after is skipped.
    too_deep: bool,
    /// The closing `}` was consumed.
    closed: bool,
}

impl<'a> TypeExpressionParser<'a> {
    /// Create a parser for the text in `text[start..end]`. Node ranges are
    /// absolute offsets into `text`.
    pub fn new(arena: &'a Bump, text: &'a str, start: usize, end: usize, options: &ParseOptions) -> Self {
        let scanner = Scanner::with_range(text, start, end);
        let prev_end = scanner.token_start() as u32;
        Self {
            arena,
            scanner,
            diagnostics: DiagnosticCollection::new(),
            prev_end,
            depth: 0,
            max_depth: options.max_nesting_depth,
            too_deep: false,
            closed: false,
        }
    }

    /// Skip doc comment decoration (`*` at the start of a line) between tokens.
    pub fn set_comment_mode(&mut self, on: bool) {
        self.scanner.set_skip_comment_decoration(on);
    }

    /// Parse `{ type }`. Returns `None` only when the text does not start
    /// with `{`. The scanner is left on the closing brace, so nothing past
    /// the expression is tokenized.
    pub fn parse_type_expression(&mut self) -> Option<&'a TypeExpression<'a>> {
        self.next_token();
        if self.token() != SyntaxKind::OpenBraceToken {
            self.error_at_token(&messages::_0_EXPECTED, &["{"]);
            return None;
        }
        let pos = self.token_pos();
        self.next_token();
        let type_node = self.parse_top_level_type();
        if self.token() == SyntaxKind::CloseBraceToken {
            self.prev_end = self.token_end();
            self.closed = true;
        } else {
            self.error_at_token(&messages::_0_EXPECTED, &["}"]);
        }
        trace!(pos, end = self.prev_end, closed = self.closed, "type expression");
        let type_node = self.arena.alloc(type_node);
        Some(self.arena.alloc(TypeExpression {
            data: NodeData::new(SyntaxKind::TypeExpression, pos, self.prev_end),
            type_node,
        }))
    }

    /// Require that nothing but whitespace follows the closing brace.
    pub fn expect_end_of_input(&mut self) {
        if self.closed {
            self.next_token();
        }
        if self.token() != SyntaxKind::EndOfFileToken {
            self.error_at_token(&messages::UNEXPECTED_TOKEN, &[]);
        }
    }

    /// Finish parsing: returns the end of the last consumed token and all
    /// diagnostics, scanner diagnostics included, in source order.
    pub fn finish(mut self) -> (u32, DiagnosticCollection) {
        let scanner_diagnostics = self.scanner.take_diagnostics();
        self.diagnostics.extend(scanner_diagnostics);
        self.diagnostics.sort();
        (self.prev_end, self.diagnostics)
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    fn token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    #[inline]
    fn next_token(&mut self) -> SyntaxKind {
        self.prev_end = self.scanner.token_end() as u32;
        self.scanner.scan()
    }

    #[inline]
    fn token_pos(&self) -> u32 {
        self.scanner.token_start() as u32
    }

    #[inline]
    fn token_end(&self) -> u32 {
        self.scanner.token_end() as u32
    }

    fn token_span(&self) -> TextSpan {
        TextSpan::from_bounds(self.token_pos(), self.token_end())
    }

    fn expect_token(&mut self, kind: SyntaxKind) -> bool {
        if self.token() == kind {
            self.next_token();
            true
        } else {
            self.error_at_token(&messages::_0_EXPECTED, &[kind.token_text()]);
            false
        }
    }

    fn optional_token(&mut self, kind: SyntaxKind) -> bool {
        if self.token() == kind {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Report a diagnostic unless one was already reported at the same
    /// position; cascading errors from one mistake collapse into the first.
    fn report(&mut self, span: TextSpan, message: &DiagnosticMessage, args: &[&str]) {
        if self.too_deep {
            return;
        }
        if self.diagnostics.diagnostics().last().map_or(false, |d| d.start() == span.start) {
            return;
        }
        self.diagnostics.report(span, message, args);
    }

    fn error_at_token(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        let span = self.token_span();
        self.report(span, message, args);
    }

    /// Report at the position right after the last consumed token.
    fn error_after_marker(&mut self, message: &DiagnosticMessage) {
        let end = if self.token() == SyntaxKind::EndOfFileToken {
            self.prev_end
        } else {
            self.token_end()
        };
        self.report(TextSpan::from_bounds(self.prev_end, end), message, &[]);
    }

    fn missing_type(&self, pos: u32) -> TypeNode<'a> {
        TypeNode::UnknownType(
            NodeData::new(SyntaxKind::UnknownType, pos, pos).with_flags(NodeFlags::THIS_NODE_HAS_ERROR),
        )
    }

    fn node_data(&self, kind: SyntaxKind, pos: u32, flags: NodeFlags) -> NodeData {
        NodeData::new(kind, pos, self.prev_end).with_flags(flags)
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// The body of a type expression: a type, an unparenthesized union, and
    /// an optional trailing `=`.
    fn parse_top_level_type(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        let mut ty = self.parse_type();
        if self.token() == SyntaxKind::BarToken {
            ty = self.parse_union_rest(pos, ty, NodeFlags::NONE);
        }
        if self.optional_token(SyntaxKind::EqualsToken) {
            ty = TypeNode::OptionalType(OptionalTypeNode {
                data: self.node_data(SyntaxKind::OptionalType, pos, NodeFlags::NONE),
                type_node: self.arena.alloc(ty),
            });
        }
        ty
    }

    /// Collect `| T` constituents after `first`; the current token is `|`.
    fn parse_union_rest(&mut self, pos: u32, first: TypeNode<'a>, mut flags: NodeFlags) -> TypeNode<'a> {
        let mut types = vec![first];
        while self.optional_token(SyntaxKind::BarToken) {
            if !can_start_type(self.token()) {
                self.error_after_marker(&messages::TYPE_EXPECTED);
                flags |= NodeFlags::THIS_NODE_HAS_ERROR;
                break;
            }
            types.push(self.parse_type());
        }
        TypeNode::UnionType(UnionTypeNode {
            data: self.node_data(SyntaxKind::UnionType, pos, flags),
            types: alloc_vec_in(self.arena, types),
        })
    }

    /// A single type with its postfix operators. Every nested type goes
    /// through here, so this is where the nesting limit is enforced.
    fn parse_type(&mut self) -> TypeNode<'a> {
        if self.depth >= self.max_depth {
            return self.nesting_too_deep();
        }
        self.depth += 1;
        let ty = ensure_sufficient_stack(|| self.parse_postfix_type());
        self.depth -= 1;
        ty
    }

    fn nesting_too_deep(&mut self) -> TypeNode<'a> {
        self.error_at_token(&messages::TYPE_EXPRESSION_IS_NESTED_TOO_DEEPLY, &[]);
        self.too_deep = true;
        if self.token() == SyntaxKind::EndOfFileToken {
            return self.missing_type(self.prev_end);
        }
        let pos = self.token_pos();
        while self.token() != SyntaxKind::EndOfFileToken {
            self.next_token();
        }
        TypeNode::UnknownType(self.node_data(SyntaxKind::UnknownType, pos, NodeFlags::THIS_NODE_HAS_ERROR))
    }

    /// Parse the type after a prefix marker (`!`, `...`, `this:`, `:`),
    /// reporting right after the marker when there is none.
    fn parse_type_after_marker(&mut self) -> (TypeNode<'a>, NodeFlags) {
        if can_start_type(self.token()) {
            (self.parse_type(), NodeFlags::NONE)
        } else {
            self.error_after_marker(&messages::TYPE_EXPECTED);
            (self.missing_type(self.prev_end), NodeFlags::THIS_NODE_HAS_ERROR)
        }
    }

    fn parse_postfix_type(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        let mut ty = self.parse_non_postfix_type();
        loop {
            match self.token() {
                SyntaxKind::OpenBracketToken if self.scanner.peek() == SyntaxKind::CloseBracketToken => {
                    self.next_token();
                    self.next_token();
                    // `T[][]` stays one node with a dimension count.
                    let (element_type, dimensions) = match ty {
                        TypeNode::ArrayType(array) => (array.element_type, array.dimensions + 1),
                        other => (&*self.arena.alloc(other), 1),
                    };
                    ty = TypeNode::ArrayType(ArrayTypeNode {
                        data: self.node_data(SyntaxKind::ArrayType, pos, NodeFlags::NONE),
                        element_type,
                        dimensions,
                    });
                }
                SyntaxKind::QuestionToken => {
                    self.next_token();
                    ty = TypeNode::NullableType(NullableTypeNode {
                        data: self.node_data(SyntaxKind::NullableType, pos, NodeFlags::POSTFIX),
                        type_node: self.arena.alloc(ty),
                    });
                }
                SyntaxKind::ExclamationToken => {
                    self.next_token();
                    ty = TypeNode::NonNullableType(NonNullableTypeNode {
                        data: self.node_data(SyntaxKind::NonNullableType, pos, NodeFlags::POSTFIX),
                        type_node: self.arena.alloc(ty),
                    });
                }
                _ => return ty,
            }
        }
    }

    fn parse_non_postfix_type(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::AsteriskToken => {
                self.next_token();
                TypeNode::AllType(self.node_data(SyntaxKind::AllType, pos, NodeFlags::NONE))
            }
            SyntaxKind::QuestionToken => {
                self.next_token();
                if is_unknown_type_terminator(self.token()) {
                    return TypeNode::UnknownType(self.node_data(SyntaxKind::UnknownType, pos, NodeFlags::NONE));
                }
                let inner = self.parse_type();
                TypeNode::NullableType(NullableTypeNode {
                    data: self.node_data(SyntaxKind::NullableType, pos, NodeFlags::NONE),
                    type_node: self.arena.alloc(inner),
                })
            }
            SyntaxKind::ExclamationToken => {
                self.next_token();
                let (inner, flags) = self.parse_type_after_marker();
                TypeNode::NonNullableType(NonNullableTypeNode {
                    data: self.node_data(SyntaxKind::NonNullableType, pos, flags),
                    type_node: self.arena.alloc(inner),
                })
            }
            SyntaxKind::DotDotDotToken => {
                self.next_token();
                let (inner, flags) = self.parse_type_after_marker();
                TypeNode::VariadicType(VariadicTypeNode {
                    data: self.node_data(SyntaxKind::VariadicType, pos, flags),
                    type_node: self.arena.alloc(inner),
                })
            }
            SyntaxKind::OpenBraceToken => self.parse_record_type(),
            SyntaxKind::OpenParenToken => {
                if self.is_start_of_arrow_function() {
                    self.parse_arrow_function_type(pos, false)
                } else {
                    self.parse_parenthesized_type()
                }
            }
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(),
            SyntaxKind::FunctionKeyword => {
                if self.scanner.peek() == SyntaxKind::OpenParenToken {
                    self.parse_function_type()
                } else {
                    self.parse_type_reference()
                }
            }
            SyntaxKind::NewKeyword if self.scanner.peek() == SyntaxKind::OpenParenToken => {
                self.next_token();
                self.parse_arrow_function_type(pos, true)
            }
            SyntaxKind::ThisKeyword | SyntaxKind::NewKeyword => self.parse_this_or_new_type(),
            SyntaxKind::VarKeyword | SyntaxKind::NullKeyword | SyntaxKind::UndefinedKeyword => {
                let keyword = match self.token() {
                    SyntaxKind::VarKeyword => TypeKeyword::Var,
                    SyntaxKind::NullKeyword => TypeKeyword::Null,
                    _ => TypeKeyword::Undefined,
                };
                self.next_token();
                TypeNode::KeywordType(KeywordTypeNode {
                    data: self.node_data(SyntaxKind::KeywordType, pos, NodeFlags::NONE),
                    keyword,
                })
            }
            SyntaxKind::TypeOfKeyword => self.parse_typeof_type(),
            SyntaxKind::Identifier => self.parse_type_reference(),
            _ => {
                self.error_at_token(&messages::TYPE_EXPECTED, &[]);
                self.missing_type(pos)
            }
        }
    }

    /// `this:T` or `new:T`; the current token is the keyword.
    fn parse_this_or_new_type(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        let is_this = self.token() == SyntaxKind::ThisKeyword;
        self.next_token();
        let (inner, flags) = if self.expect_token(SyntaxKind::ColonToken) {
            self.parse_type_after_marker()
        } else {
            (self.missing_type(self.prev_end), NodeFlags::THIS_NODE_HAS_ERROR)
        };
        let type_node = self.arena.alloc(inner);
        if is_this {
            TypeNode::ThisType(ThisTypeNode {
                data: self.node_data(SyntaxKind::ThisType, pos, flags),
                type_node,
            })
        } else {
            TypeNode::NewType(NewTypeNode {
                data: self.node_data(SyntaxKind::NewType, pos, flags),
                type_node,
            })
        }
    }

    /// `typeof X` is rejected; the operand is parsed as a type reference so
    /// the rest of the expression still lines up.
    fn parse_typeof_type(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        self.error_at_token(&messages::TYPEOF_TYPES_ARE_NOT_SUPPORTED, &[]);
        self.next_token();
        if !self.token().is_identifier_or_keyword() {
            self.error_after_marker(&messages::TYPE_EXPECTED);
            return self.missing_type(self.prev_end);
        }
        let mut ty = self.parse_type_reference();
        let data = ty.data_mut();
        data.range.pos = pos;
        data.flags |= NodeFlags::THIS_NODE_HAS_ERROR;
        ty
    }

    /// `(A|B|...)`; the current token is `(`.
    fn parse_parenthesized_type(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        self.next_token();
        if self.token() == SyntaxKind::CloseParenToken {
            self.error_at_token(&messages::TYPE_EXPECTED, &[]);
            self.next_token();
            return TypeNode::UnknownType(self.node_data(
                SyntaxKind::UnknownType,
                pos,
                NodeFlags::THIS_NODE_HAS_ERROR,
            ));
        }

        let first = self.parse_type();
        let mut types = vec![first];
        let mut flags = NodeFlags::PARENTHESIZED;
        while self.optional_token(SyntaxKind::BarToken) {
            if !can_start_type(self.token()) {
                self.error_after_marker(&messages::TYPE_EXPECTED);
                flags |= NodeFlags::THIS_NODE_HAS_ERROR;
                break;
            }
            types.push(self.parse_type());
        }
        if !self.expect_token(SyntaxKind::CloseParenToken) {
            flags |= NodeFlags::THIS_NODE_HAS_ERROR;
        }
        if types.len() < 2 && !flags.contains(NodeFlags::THIS_NODE_HAS_ERROR) {
            self.report(
                TextSpan::from_bounds(pos, self.prev_end),
                &messages::UNION_TYPE_REQUIRES_AT_LEAST_TWO_TYPES,
                &[],
            );
            flags |= NodeFlags::THIS_NODE_HAS_ERROR;
        }
        TypeNode::UnionType(UnionTypeNode {
            data: self.node_data(SyntaxKind::UnionType, pos, flags),
            types: alloc_vec_in(self.arena, types),
        })
    }

    /// Whether the `(` at the current token opens `(...) =>`.
    fn is_start_of_arrow_function(&mut self) -> bool {
        self.scanner.look_ahead(|scanner| {
            let mut depth = 0u32;
            loop {
                match scanner.token() {
                    SyntaxKind::OpenParenToken => depth += 1,
                    SyntaxKind::CloseParenToken => {
                        depth -= 1;
                        if depth == 0 {
                            return scanner.scan() == SyntaxKind::EqualsGreaterThanToken;
                        }
                    }
                    SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken => return false,
                    _ => {}
                }
                scanner.scan();
            }
        })
    }

    /// Recover from `(...) => R` or `new (...) => R` by reading it as the
    /// equivalent `function(...)` type, flagged as an error.
    fn parse_arrow_function_type(&mut self, pos: u32, is_constructor: bool) -> TypeNode<'a> {
        let mut list = None;
        if self.expect_token(SyntaxKind::OpenParenToken) {
            list = Some(self.parse_parameter_list(true, true));
            self.expect_token(SyntaxKind::CloseParenToken);
        }
        self.expect_token(SyntaxKind::EqualsGreaterThanToken);
        let (return_type, _) = self.parse_type_after_marker();
        let message = if is_constructor {
            &messages::CONSTRUCTOR_ARROW_TYPES_ARE_NOT_SUPPORTED
        } else {
            &messages::ARROW_FUNCTION_TYPES_ARE_NOT_SUPPORTED
        };
        self.report(TextSpan::from_bounds(pos, self.prev_end), message, &[]);

        let (this_type, new_target, parameters, is_variadic_last) = match list {
            Some(list) => (list.this_type, list.new_target, list.parameters, list.is_variadic_last),
            None => (None, None, &[][..], false),
        };
        TypeNode::FunctionType(FunctionTypeNode {
            data: self.node_data(SyntaxKind::FunctionType, pos, NodeFlags::THIS_NODE_HAS_ERROR),
            this_type,
            new_target,
            parameters,
            is_variadic_last,
            return_type: Some(self.arena.alloc(return_type)),
        })
    }

    /// `function(params): R`; the current token is `function` and the next
    /// one is `(`.
    fn parse_function_type(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        self.next_token();
        self.next_token();
        let list = self.parse_parameter_list(false, true);
        let mut flags = NodeFlags::NONE;
        if list.has_error || !self.expect_token(SyntaxKind::CloseParenToken) {
            flags |= NodeFlags::THIS_NODE_HAS_ERROR;
        }
        let return_type = self.parse_return_type(&mut flags);
        TypeNode::FunctionType(FunctionTypeNode {
            data: self.node_data(SyntaxKind::FunctionType, pos, flags),
            this_type: list.this_type,
            new_target: list.new_target,
            parameters: list.parameters,
            is_variadic_last: list.is_variadic_last,
            return_type,
        })
    }

    /// An optional `: R` after a parameter list.
    fn parse_return_type(&mut self, flags: &mut NodeFlags) -> Option<&'a TypeNode<'a>> {
        if !self.optional_token(SyntaxKind::ColonToken) {
            return None;
        }
        let (ty, type_flags) = self.parse_type_after_marker();
        *flags |= type_flags;
        Some(self.arena.alloc(ty))
    }

    /// Parameters up to (not including) the closing `)`.
    ///
    /// A leading `this:T` or `new:T` is split out when `split_context` is set
    /// and kept in `parameters` as a `ThisType`/`NewType` otherwise. Named
    /// parameters are reported unless `names_allowed`, which is only the case
    /// while recovering an arrow function type.
    fn parse_parameter_list(&mut self, names_allowed: bool, split_context: bool) -> ParameterList<'a> {
        let mut list = ParameterList {
            this_type: None,
            new_target: None,
            parameters: &[],
            is_variadic_last: false,
            has_error: false,
        };
        let mut parameters = Vec::new();
        if self.token() == SyntaxKind::CloseParenToken {
            return list;
        }

        let mut pending_rest: Option<TextSpan> = None;
        loop {
            if let Some(span) = pending_rest.take() {
                self.report(span, &messages::A_REST_PARAMETER_MUST_BE_LAST, &[]);
                list.has_error = true;
            }

            let pos = self.token_pos();
            let is_context_parameter = matches!(self.token(), SyntaxKind::ThisKeyword | SyntaxKind::NewKeyword)
                && self.scanner.peek() == SyntaxKind::ColonToken;
            if is_context_parameter {
                let first = parameters.is_empty() && list.this_type.is_none() && list.new_target.is_none();
                let is_this = self.token() == SyntaxKind::ThisKeyword;
                if first && !split_context {
                    let ty = self.parse_this_or_new_type();
                    list.has_error |= ty.contains_error();
                    parameters.push(ty);
                } else if first {
                    self.next_token();
                    self.next_token();
                    let (ty, flags) = self.parse_type_after_marker();
                    list.has_error |= !flags.is_empty();
                    let ty = &*self.arena.alloc(ty);
                    if is_this {
                        list.this_type = Some(ty);
                    } else {
                        list.new_target = Some(ty);
                    }
                } else {
                    let keyword = if is_this { "this" } else { "new" };
                    self.error_at_token(&messages::THIS_AND_NEW_MUST_BE_THE_FIRST_PARAMETER, &[keyword]);
                    list.has_error = true;
                    let mut ty = self.parse_this_or_new_type();
                    ty.data_mut().flags |= NodeFlags::THIS_NODE_HAS_ERROR;
                    parameters.push(ty);
                }
            } else {
                if self.token() == SyntaxKind::Identifier && self.scanner.peek() == SyntaxKind::ColonToken {
                    self.next_token();
                    if !names_allowed {
                        self.report(
                            TextSpan::from_bounds(pos, self.token_end()),
                            &messages::NAMED_PARAMETERS_ARE_NOT_SUPPORTED,
                            &[],
                        );
                        list.has_error = true;
                    }
                    self.next_token();
                }
                let ty = self.parse_parameter_type();
                if let TypeNode::VariadicType(variadic) = &ty {
                    pending_rest = Some(variadic.data.range.to_span());
                }
                parameters.push(ty);
            }

            if self.token() == SyntaxKind::CommaToken {
                let comma = self.token_span();
                self.next_token();
                if self.token() == SyntaxKind::CloseParenToken {
                    self.report(comma, &messages::TRAILING_COMMA_NOT_ALLOWED, &[]);
                    list.has_error = true;
                    break;
                }
                continue;
            }
            break;
        }

        list.is_variadic_last = matches!(parameters.last(), Some(TypeNode::VariadicType(_)));
        list.parameters = alloc_vec_in(self.arena, parameters);
        list
    }

    /// A parameter type with an optional postfix `=`.
    fn parse_parameter_type(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        let ty = self.parse_type();
        if self.optional_token(SyntaxKind::EqualsToken) {
            return TypeNode::OptionalType(OptionalTypeNode {
                data: self.node_data(SyntaxKind::OptionalType, pos, NodeFlags::NONE),
                type_node: self.arena.alloc(ty),
            });
        }
        ty
    }

    /// `{a: T, b, (): R, m(): R}`; the current token is `{`.
    fn parse_record_type(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        self.next_token();
        let mut members = Vec::new();
        let mut flags = NodeFlags::NONE;
        while !matches!(self.token(), SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken) {
            match self.parse_record_member() {
                Some(member) => members.push(member),
                None => {
                    flags |= NodeFlags::THIS_NODE_HAS_ERROR;
                    while !matches!(
                        self.token(),
                        SyntaxKind::CommaToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
                    ) {
                        self.next_token();
                    }
                }
            }
            if !self.optional_token(SyntaxKind::CommaToken) {
                break;
            }
        }
        if !self.expect_token(SyntaxKind::CloseBraceToken) {
            flags |= NodeFlags::THIS_NODE_HAS_ERROR;
        }
        TypeNode::RecordType(RecordTypeNode {
            data: self.node_data(SyntaxKind::RecordType, pos, flags),
            members: alloc_vec_in(self.arena, members),
        })
    }

    fn parse_record_member(&mut self) -> Option<RecordMember<'a>> {
        let pos = self.token_pos();
        let mut flags = NodeFlags::NONE;

        if self.token() == SyntaxKind::OpenParenToken {
            self.next_token();
            let list = self.parse_parameter_list(false, false);
            if list.has_error || !self.expect_token(SyntaxKind::CloseParenToken) {
                flags |= NodeFlags::THIS_NODE_HAS_ERROR;
            }
            let type_node = self.parse_return_type(&mut flags);
            return Some(RecordMember {
                data: self.node_data(SyntaxKind::RecordMember, pos, flags),
                name: None,
                parameters: list.parameters,
                type_node,
                is_call_signature: true,
                is_method: false,
            });
        }

        let kind = self.token();
        let text = match kind {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral => self.scanner.token_value(),
            k if k.is_identifier_or_keyword() => self.scanner.token_text(),
            _ => {
                self.error_at_token(&messages::IDENTIFIER_EXPECTED, &[]);
                return None;
            }
        };
        let name_kind = if kind.is_literal() { kind } else { SyntaxKind::Identifier };
        let name = PropertyName {
            data: NodeData::new(name_kind, pos, self.token_end()),
            text,
        };
        self.next_token();

        if self.token() == SyntaxKind::OpenParenToken {
            self.next_token();
            let list = self.parse_parameter_list(false, false);
            if list.has_error || !self.expect_token(SyntaxKind::CloseParenToken) {
                flags |= NodeFlags::THIS_NODE_HAS_ERROR;
            }
            let type_node = self.parse_return_type(&mut flags);
            return Some(RecordMember {
                data: self.node_data(SyntaxKind::RecordMember, pos, flags),
                name: Some(name),
                parameters: list.parameters,
                type_node,
                is_call_signature: false,
                is_method: true,
            });
        }

        let type_node = self.parse_return_type(&mut flags);
        Some(RecordMember {
            data: self.node_data(SyntaxKind::RecordMember, pos, flags),
            name: Some(name),
            parameters: &[],
            type_node,
            is_call_signature: false,
            is_method: false,
        })
    }

    /// `[A, B]`; the current token is `[`.
    fn parse_tuple_type(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        self.next_token();
        let mut elements = Vec::new();
        let mut flags = NodeFlags::NONE;
        if self.token() != SyntaxKind::CloseBracketToken {
            loop {
                if self.token() == SyntaxKind::CommaToken {
                    self.error_at_token(&messages::TYPE_EXPECTED, &[]);
                    flags |= NodeFlags::THIS_NODE_HAS_ERROR;
                    elements.push(self.missing_type(self.token_pos()));
                } else {
                    elements.push(self.parse_type());
                }
                if self.token() == SyntaxKind::CommaToken {
                    let comma = self.token_span();
                    self.next_token();
                    if self.token() == SyntaxKind::CloseBracketToken {
                        self.report(comma, &messages::TRAILING_COMMA_NOT_ALLOWED, &[]);
                        flags |= NodeFlags::THIS_NODE_HAS_ERROR;
                        break;
                    }
                    continue;
                }
                break;
            }
        }
        if !self.expect_token(SyntaxKind::CloseBracketToken) {
            flags |= NodeFlags::THIS_NODE_HAS_ERROR;
        }
        TypeNode::TupleType(TupleTypeNode {
            data: self.node_data(SyntaxKind::TupleType, pos, flags),
            elements: alloc_vec_in(self.arena, elements),
        })
    }

    /// `a.b.c` with optional `.<T, ...>` type arguments.
    fn parse_type_reference(&mut self) -> TypeNode<'a> {
        let pos = self.token_pos();
        let mut flags = NodeFlags::NONE;
        let mut type_name = EntityName::Identifier(self.parse_identifier_name());
        let mut type_arguments = None;

        while self.optional_token(SyntaxKind::DotToken) {
            if self.token() == SyntaxKind::LessThanToken {
                type_arguments = Some(self.parse_type_arguments(&mut flags));
                break;
            }
            if !self.token().is_identifier_or_keyword() {
                self.error_at_token(&messages::IDENTIFIER_EXPECTED, &[]);
                flags |= NodeFlags::THIS_NODE_HAS_ERROR;
                break;
            }
            let right = self.parse_identifier_name();
            type_name = EntityName::QualifiedName(self.arena.alloc(QualifiedName {
                data: self.node_data(SyntaxKind::QualifiedName, pos, NodeFlags::NONE),
                left: type_name,
                right,
            }));
        }

        if type_arguments.is_none() && self.token() == SyntaxKind::LessThanToken {
            self.error_at_token(&messages::TYPE_ARGUMENTS_MUST_FOLLOW_A_DOT, &[]);
            flags |= NodeFlags::THIS_NODE_HAS_ERROR;
            type_arguments = Some(self.parse_type_arguments(&mut flags));
        }

        TypeNode::TypeReference(TypeReferenceNode {
            data: self.node_data(SyntaxKind::TypeReference, pos, flags),
            type_name,
            type_arguments,
        })
    }

    /// `<T, ...>`; the current token is `<`.
    fn parse_type_arguments(&mut self, flags: &mut NodeFlags) -> NodeList<'a, TypeNode<'a>> {
        let open = self.token_pos();
        self.next_token();
        if self.token() == SyntaxKind::GreaterThanToken {
            self.report(
                TextSpan::from_bounds(open, self.token_end()),
                &messages::TYPE_ARGUMENT_LIST_CANNOT_BE_EMPTY,
                &[],
            );
            self.next_token();
            *flags |= NodeFlags::THIS_NODE_HAS_ERROR;
            return &[];
        }

        let mut arguments = Vec::new();
        loop {
            arguments.push(self.parse_type());
            if self.token() == SyntaxKind::CommaToken {
                let comma = self.token_span();
                self.next_token();
                if self.token() == SyntaxKind::GreaterThanToken {
                    self.report(comma, &messages::TRAILING_COMMA_NOT_ALLOWED, &[]);
                    *flags |= NodeFlags::THIS_NODE_HAS_ERROR;
                    break;
                }
                continue;
            }
            break;
        }
        if !self.expect_token(SyntaxKind::GreaterThanToken) {
            *flags |= NodeFlags::THIS_NODE_HAS_ERROR;
        }
        alloc_vec_in(self.arena, arguments)
    }

    /// Consume the current identifier or keyword as an identifier.
    fn parse_identifier_name(&mut self) -> Identifier<'a> {
        let identifier = Identifier {
            data: NodeData::new(SyntaxKind::Identifier, self.token_pos(), self.token_end()),
            text: self.scanner.token_text(),
        };
        self.next_token();
        identifier
    }
}

/// Tokens that can begin a type.
fn can_start_type(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::AsteriskToken
            | SyntaxKind::QuestionToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::OpenParenToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::DotDotDotToken
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ThisKeyword
            | SyntaxKind::NewKeyword
            | SyntaxKind::VarKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::UndefinedKeyword
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::Identifier
    )
}

/// Tokens after which a prefix `?` stands alone as the unknown type.
fn is_unknown_type_terminator(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::CommaToken
            | SyntaxKind::CloseBraceToken
            | SyntaxKind::CloseParenToken
            | SyntaxKind::CloseBracketToken
            | SyntaxKind::GreaterThanToken
            | SyntaxKind::EqualsToken
            | SyntaxKind::BarToken
            | SyntaxKind::EndOfFileToken
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse<'a>(arena: &'a Bump, text: &'a str, options: &ParseOptions) -> (Option<&'a TypeExpression<'a>>, DiagnosticCollection) {
        let mut parser = TypeExpressionParser::new(arena, text, 0, text.len(), options);
        let result = parser.parse_type_expression();
        parser.expect_end_of_input();
        let (_, diagnostics) = parser.finish();
        (result, diagnostics)
    }

    #[test]
    fn test_nesting_limit_reports_once() {
        let arena = Bump::new();
        let text = format!("{{{}number{}}}", "(".repeat(50), ")".repeat(50));
        let text = arena.alloc_str(&text);
        let options = ParseOptions { max_nesting_depth: 10 };
        let (result, diagnostics) = parse(&arena, text, &options);
        assert!(result.is_some());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.diagnostics()[0].code, messages::TYPE_EXPRESSION_IS_NESTED_TOO_DEEPLY.code);
    }

    #[test]
    fn test_comment_mode_stops_at_closing_brace() {
        let arena = Bump::new();
        let text = "{number} #not-scanned";
        let mut parser = TypeExpressionParser::new(&arena, text, 0, text.len(), &ParseOptions::default());
        parser.set_comment_mode(true);
        assert!(parser.parse_type_expression().is_some());
        let (end, diagnostics) = parser.finish();
        assert_eq!(end, 8);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_missing_open_brace() {
        let arena = Bump::new();
        let (result, diagnostics) = parse(&arena, "number", &ParseOptions::default());
        assert!(result.is_none());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_cascading_errors_collapse() {
        let arena = Bump::new();
        let (_, diagnostics) = parse(&arena, "{number string}", &ParseOptions::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.diagnostics()[0].message_text, "'}' expected.");
    }
}
