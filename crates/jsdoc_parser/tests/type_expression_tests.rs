//! Type expression parser integration tests.
//!
//! Verifies accepted constructs, their AST shapes, and the diagnostics for
//! malformed input.

use bumpalo::Bump;
use jsdoc_ast::node::*;
use jsdoc_ast::syntax_kind::SyntaxKind;
use jsdoc_ast::types::{NodeFlags, TypeKeyword};
use jsdoc_diagnostics::DiagnosticKind;
use jsdoc_parser::{
    parse_doc_comment_with, parse_type_expression, parse_type_expression_with, ParseOptions, DEFAULT_MAX_NESTING_DEPTH,
};

/// Helper: parse `source` and return the body type, asserting success.
fn parse_ok<'a>(arena: &'a Bump, source: &'a str) -> &'a TypeNode<'a> {
    let result = parse_type_expression(arena, source, 0);
    let messages: Vec<String> = result.diagnostics.iter().map(|d| d.to_string()).collect();
    assert!(result.is_ok(), "source: {source}, diagnostics: {messages:?}");
    let expression = result.type_expression.unwrap();
    assert_eq!(expression.data.range.pos, 0);
    assert_eq!(expression.data.range.end as usize, source.len());
    expression.type_node
}

/// Helper: assert that parsing `source` fails.
fn assert_invalid(source: &str) {
    let arena = Bump::new();
    let result = parse_type_expression(&arena, source, 0);
    assert!(
        result.type_expression.is_none() || !result.diagnostics.is_empty(),
        "expected diagnostics for {source}"
    );
}

fn first_diagnostic_code(source: &str) -> u32 {
    let arena = Bump::new();
    let result = parse_type_expression(&arena, source, 0);
    result.diagnostics.diagnostics().first().map(|d| d.code).unwrap_or(0)
}

// ============================================================================
// Accepted constructs
// ============================================================================

#[test]
fn test_valid_type_expressions() {
    let sources = [
        "{?}",
        "{*}",
        "{?number}",
        "{number?}",
        "{!number}",
        "{number!}",
        "{{}}",
        "{{foo}}",
        "{{foo: number}}",
        "{{foo, bar}}",
        "{{foo: number, bar}}",
        "{{foo, bar: number}}",
        "{{foo: number, bar: number}}",
        "{{function}}",
        "{{a,}}",
        "{{(): number}}",
        "{{foo(): number}}",
        "{(number|string)}",
        "{number|string}",
        "{function()}",
        "{function(string, boolean)}",
        "{this:a.b}",
        "{new:a.b}",
        "{...number}",
        "{number=}",
        "{?=}",
        "{a.<number>}",
        "{a.<number,string>}",
        "{a.function}",
        "{a[]}",
        "{a[][]}",
        "{a[][]=}",
        "{var}",
        "{null}",
        "{undefined}",
        "{[]}",
        "{[number]}",
        "{[number,string]}",
        "{[number,string,boolean]}",
    ];
    for source in sources {
        let arena = Bump::new();
        let ty = parse_ok(&arena, source);
        // The body spans exactly the text between the braces.
        assert_eq!(ty.data().range.pos, 1, "{source}");
        assert_eq!(ty.data().range.end as usize, source.len() - 1, "{source}");
        assert!(!ty.contains_error(), "{source}");
    }
}

#[test]
fn test_unknown_and_all_types() {
    let arena = Bump::new();
    assert_eq!(parse_ok(&arena, "{?}").kind(), SyntaxKind::UnknownType);
    assert_eq!(parse_ok(&arena, "{*}").kind(), SyntaxKind::AllType);
}

#[test]
fn test_all_type_with_postfix_and_union() {
    let arena = Bump::new();
    assert_eq!(parse_ok(&arena, "{*|number}").kind(), SyntaxKind::UnionType);
    assert_eq!(parse_ok(&arena, "{*[]}").kind(), SyntaxKind::ArrayType);
    match parse_ok(&arena, "{*=}") {
        TypeNode::OptionalType(optional) => assert_eq!(optional.type_node.kind(), SyntaxKind::AllType),
        other => panic!("expected optional type, got {other:?}"),
    }
}

#[test]
fn test_prefix_and_postfix_nullable() {
    let arena = Bump::new();
    match parse_ok(&arena, "{?number}") {
        TypeNode::NullableType(n) => {
            assert!(!n.data.flags.contains(NodeFlags::POSTFIX));
            assert_eq!(n.type_node.kind(), SyntaxKind::TypeReference);
        }
        other => panic!("expected nullable type, got {other:?}"),
    }
    match parse_ok(&arena, "{number!}") {
        TypeNode::NonNullableType(n) => assert!(n.data.flags.contains(NodeFlags::POSTFIX)),
        other => panic!("expected non-nullable type, got {other:?}"),
    }
}

#[test]
fn test_record_members() {
    let arena = Bump::new();
    let TypeNode::RecordType(record) = parse_ok(&arena, "{{foo: number, bar, (): string, baz(): number}}") else {
        panic!("expected record type");
    };
    assert_eq!(record.members.len(), 4);

    let foo = &record.members[0];
    assert_eq!(foo.name.as_ref().map(|n| n.text), Some("foo"));
    assert_eq!(foo.type_node.map(|t| t.kind()), Some(SyntaxKind::TypeReference));

    let bar = &record.members[1];
    assert!(bar.type_node.is_none());

    let call = &record.members[2];
    assert!(call.is_call_signature);
    assert!(call.name.is_none());

    let method = &record.members[3];
    assert!(method.is_method);
    assert_eq!(method.name.as_ref().map(|n| n.text), Some("baz"));
}

#[test]
fn test_record_literal_member_names() {
    let arena = Bump::new();
    let TypeNode::RecordType(record) = parse_ok(&arena, "{{'quoted key': number, 1: string}}") else {
        panic!("expected record type");
    };
    let first = record.members[0].name.as_ref().unwrap();
    assert_eq!(first.data.kind, SyntaxKind::StringLiteral);
    assert_eq!(first.text, "quoted key");
    assert_eq!(record.members[1].name.as_ref().unwrap().data.kind, SyntaxKind::NumericLiteral);
}

#[test]
fn test_unions() {
    let arena = Bump::new();
    let TypeNode::UnionType(parenthesized) = parse_ok(&arena, "{(number|string|boolean)}") else {
        panic!("expected union");
    };
    assert_eq!(parenthesized.types.len(), 3);
    assert!(parenthesized.data.flags.contains(NodeFlags::PARENTHESIZED));

    let TypeNode::UnionType(bare) = parse_ok(&arena, "{number|string}") else {
        panic!("expected union");
    };
    assert_eq!(bare.types.len(), 2);
    assert!(!bare.data.flags.contains(NodeFlags::PARENTHESIZED));
}

#[test]
fn test_function_types() {
    let arena = Bump::new();
    let TypeNode::FunctionType(f) = parse_ok(&arena, "{function(this:Window, string, ...number): boolean}") else {
        panic!("expected function type");
    };
    assert_eq!(f.this_type.map(|t| t.kind()), Some(SyntaxKind::TypeReference));
    assert!(f.new_target.is_none());
    assert_eq!(f.parameters.len(), 2);
    assert!(f.is_variadic_last);
    assert_eq!(f.return_type.map(|t| t.kind()), Some(SyntaxKind::TypeReference));

    let TypeNode::FunctionType(ctor) = parse_ok(&arena, "{function(new:Foo, number=)}") else {
        panic!("expected function type");
    };
    assert!(ctor.new_target.is_some());
    assert_eq!(ctor.parameters[0].kind(), SyntaxKind::OptionalType);
    assert!(ctor.return_type.is_none());
}

#[test]
fn test_this_and_new_standalone() {
    let arena = Bump::new();
    assert_eq!(parse_ok(&arena, "{this:a.b}").kind(), SyntaxKind::ThisType);
    assert_eq!(parse_ok(&arena, "{new:a.b}").kind(), SyntaxKind::NewType);
}

#[test]
fn test_optional_and_variadic() {
    let arena = Bump::new();
    let TypeNode::OptionalType(optional) = parse_ok(&arena, "{?=}") else {
        panic!("expected optional type");
    };
    assert_eq!(optional.type_node.kind(), SyntaxKind::UnknownType);

    let TypeNode::VariadicType(variadic) = parse_ok(&arena, "{...number}") else {
        panic!("expected variadic type");
    };
    assert_eq!(variadic.type_node.kind(), SyntaxKind::TypeReference);
}

#[test]
fn test_type_references() {
    let arena = Bump::new();
    let TypeNode::TypeReference(generic) = parse_ok(&arena, "{a.<number,string>}") else {
        panic!("expected type reference");
    };
    assert_eq!(generic.type_name.text(), "a");
    assert_eq!(generic.type_arguments.map(|args| args.len()), Some(2));

    let TypeNode::TypeReference(qualified) = parse_ok(&arena, "{a.b.function}") else {
        panic!("expected type reference");
    };
    assert_eq!(qualified.type_name.text(), "a.b.function");
    assert!(qualified.type_arguments.is_none());
}

#[test]
fn test_array_dimensions() {
    let arena = Bump::new();
    let TypeNode::OptionalType(optional) = parse_ok(&arena, "{a[][]=}") else {
        panic!("expected optional type");
    };
    let TypeNode::ArrayType(array) = optional.type_node else {
        panic!("expected array type");
    };
    assert_eq!(array.dimensions, 2);
    assert_eq!(array.element_type.kind(), SyntaxKind::TypeReference);
}

#[test]
fn test_keyword_types() {
    let arena = Bump::new();
    for (source, keyword) in [("{var}", TypeKeyword::Var), ("{null}", TypeKeyword::Null), ("{undefined}", TypeKeyword::Undefined)] {
        match parse_ok(&arena, source) {
            TypeNode::KeywordType(k) => assert_eq!(k.keyword, keyword),
            other => panic!("expected keyword type, got {other:?}"),
        }
    }
}

#[test]
fn test_tuples() {
    let arena = Bump::new();
    let TypeNode::TupleType(empty) = parse_ok(&arena, "{[]}") else {
        panic!("expected tuple");
    };
    assert!(empty.elements.is_empty());
    let TypeNode::TupleType(triple) = parse_ok(&arena, "{[number,string,boolean]}") else {
        panic!("expected tuple");
    };
    assert_eq!(triple.elements.len(), 3);
}

#[test]
fn test_whitespace_inside_braces() {
    let arena = Bump::new();
    let result = parse_type_expression(&arena, "{ function ( string ) : number }", 0);
    assert!(result.is_ok());
}

#[test]
fn test_start_offset() {
    let arena = Bump::new();
    let text = "xx {number}";
    let result = parse_type_expression(&arena, text, 3);
    assert!(result.is_ok());
    let expression = result.type_expression.unwrap();
    assert_eq!(expression.data.range.pos, 3);
    assert_eq!(expression.type_node.data().range.pos, 4);
}

// ============================================================================
// Rejected input
// ============================================================================

#[test]
fn test_invalid_type_expressions() {
    let sources = [
        "{}",
        "{(a|)}",
        "{()}",
        "{!}",
        "{function(a,)}",
        "{this:}",
        "{new:}",
        "{...}",
        "{=}",
        "{*foo}",
        "{a<>}",
        "{a.<>}",
        "{a.<a,>}",
        "{() => string}",
        "{new () => string}",
        "{typeof M}",
        "{function(a: number)}",
        "{[,]}",
        "{[number,]}",
        "{[,number]}",
    ];
    for source in sources {
        assert_invalid(source);
    }
}

#[test]
fn test_empty_braces_is_type_expected() {
    assert_eq!(first_diagnostic_code("{}"), 1110);
}

#[test]
fn test_missing_type_reported_after_marker() {
    let arena = Bump::new();
    let result = parse_type_expression(&arena, "{!}", 0);
    let diagnostic = &result.diagnostics.diagnostics()[0];
    assert_eq!(diagnostic.message_text, "Type expected.");
    assert_eq!(diagnostic.start(), 2);
    let ty = result.type_expression.unwrap().type_node;
    assert!(ty.data().has_error());
}

#[test]
fn test_single_parenthesized_type() {
    assert_eq!(first_diagnostic_code("{(number)}"), 8101);
}

#[test]
fn test_trailing_commas() {
    assert_eq!(first_diagnostic_code("{function(a,)}"), 1009);
    assert_eq!(first_diagnostic_code("{a.<a,>}"), 1009);
    assert_eq!(first_diagnostic_code("{[number,]}"), 1009);
}

#[test]
fn test_rest_parameter_must_be_last() {
    assert_eq!(first_diagnostic_code("{function(...number, string)}"), 1014);
}

#[test]
fn test_this_must_be_first_parameter() {
    let arena = Bump::new();
    let result = parse_type_expression(&arena, "{function(string, this:Foo)}", 0);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.diagnostics.diagnostics()[0].message_text,
        "'this:' may only appear as the first parameter of a function type."
    );
}

#[test]
fn test_unsupported_syntax_is_classified() {
    for source in ["{() => string}", "{new () => string}", "{typeof M}", "{function(a: number)}", "{a<number>}"] {
        let arena = Bump::new();
        let result = parse_type_expression(&arena, source, 0);
        assert!(
            result.diagnostics.has_kind(DiagnosticKind::UnsupportedSyntax),
            "expected unsupported syntax for {source}"
        );
        // Recovery still yields a node, flagged as an error.
        let ty = result.type_expression.unwrap().type_node;
        assert!(ty.contains_error(), "{source}");
    }
}

#[test]
fn test_arrow_recovers_as_function_type() {
    let arena = Bump::new();
    let result = parse_type_expression(&arena, "{(string, number) => boolean}", 0);
    assert_eq!(result.diagnostics.len(), 1);
    let TypeNode::FunctionType(f) = result.type_expression.unwrap().type_node else {
        panic!("expected function type");
    };
    assert_eq!(f.parameters.len(), 2);
    assert!(f.return_type.is_some());
}

#[test]
fn test_trailing_content_is_rejected() {
    assert_eq!(first_diagnostic_code("{number} extra"), 1012);
}

#[test]
fn test_missing_close_brace() {
    let arena = Bump::new();
    let result = parse_type_expression(&arena, "{number", 0);
    assert_eq!(result.diagnostics.diagnostics()[0].message_text, "'}' expected.");
    assert!(result.type_expression.is_some());
}

#[test]
fn test_missing_open_brace() {
    let arena = Bump::new();
    let result = parse_type_expression(&arena, "number", 0);
    assert!(result.type_expression.is_none());
    assert!(!result.is_ok());
}

#[test]
fn test_invalid_character() {
    let arena = Bump::new();
    let result = parse_type_expression(&arena, "{#}", 0);
    let codes: Vec<u32> = result.diagnostics.iter().map(|d| d.code).collect();
    assert!(codes.contains(&1127), "{codes:?}");
}

// ============================================================================
// Nesting limit
// ============================================================================

#[test]
fn test_deep_nesting_is_reported_not_overflowed() {
    let arena = Bump::new();
    let text = format!("{{{}number{}}}", "!".repeat(10_000), "");
    let text = arena.alloc_str(&text);
    let result = parse_type_expression(&arena, text, 0);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics.diagnostics()[0].code, 8102);
}

#[test]
fn test_parenthesized_nesting_at_default_limit() {
    let depth = DEFAULT_MAX_NESTING_DEPTH as usize;

    let arena = Bump::new();
    let accepted = format!("{{{}number{}}}", "(".repeat(depth - 1), "|string)".repeat(depth - 1));
    let accepted = arena.alloc_str(&accepted);
    assert!(parse_type_expression(&arena, accepted, 0).is_ok());

    let rejected = format!("{{{}number{}}}", "(".repeat(depth), ")".repeat(depth));
    let rejected = arena.alloc_str(&rejected);
    let result = parse_type_expression(&arena, rejected, 0);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics.diagnostics()[0].code, 8102);
}

#[test]
fn test_deep_nesting_on_small_thread_stack() {
    let handle = std::thread::Builder::new()
        .stack_size(256 * 1024)
        .spawn(|| {
            let arena = Bump::new();
            let text = format!("{{{}number{}}}", "(".repeat(1_000), ")".repeat(1_000));
            let text = arena.alloc_str(&text);
            let result = parse_type_expression(&arena, text, 0);
            result.diagnostics.iter().map(|d| d.code).collect::<Vec<u32>>()
        })
        .unwrap();
    assert_eq!(handle.join().unwrap(), vec![8102]);
}

#[test]
fn test_nesting_limit_at_end_of_input_keeps_ranges_ordered() {
    let arena = Bump::new();
    let options = ParseOptions { max_nesting_depth: 3 };
    let result = parse_type_expression_with(&options, &arena, "{((( ", 0);
    let codes: Vec<u32> = result.diagnostics.iter().map(|d| d.code).collect();
    assert!(codes.contains(&8102), "{codes:?}");

    let mut node = result.type_expression.unwrap().type_node;
    loop {
        let range = node.data().range;
        assert!(range.pos <= range.end, "{node:?}");
        match node {
            TypeNode::UnionType(union) => node = &union.types[0],
            TypeNode::UnknownType(data) => {
                assert_eq!((data.range.pos, data.range.end), (4, 4));
                break;
            }
            other => panic!("unexpected node {other:?}"),
        }
    }
}

#[test]
fn test_nesting_limit_at_end_of_comment_type() {
    let arena = Bump::new();
    let options = ParseOptions { max_nesting_depth: 3 };
    let source = "/**\n * @type {((( \n */";
    let result = parse_doc_comment_with(&options, &arena, source, 0, source.len()).unwrap();
    let codes: Vec<u32> = result.diagnostics.iter().map(|d| d.code).collect();
    assert!(codes.contains(&8102), "{codes:?}");
    let expression = result.comment.tags[0].type_expression().unwrap();
    assert!(expression.data.range.pos <= expression.data.range.end);
}

#[test]
fn test_start_inside_multibyte_character() {
    let arena = Bump::new();
    let result = parse_type_expression(&arena, "é{a}", 1);
    assert!(result.type_expression.is_none());
    assert_eq!(result.diagnostics.len(), 1);
    let diagnostic = &result.diagnostics.diagnostics()[0];
    assert_eq!((diagnostic.code, diagnostic.start()), (1005, 0));
    assert_eq!(diagnostic.message_text, "'{' expected.");
}

#[test]
fn test_start_past_end_of_text() {
    let arena = Bump::new();
    let result = parse_type_expression(&arena, "{a}", 10);
    assert!(result.type_expression.is_none());
    assert_eq!(result.diagnostics.diagnostics()[0].code, 1005);
}

#[test]
fn test_nesting_limit_is_configurable() {
    let arena = Bump::new();
    let options = ParseOptions { max_nesting_depth: 3 };
    let shallow = parse_type_expression_with(&options, &arena, "{!!number}", 0);
    assert!(shallow.is_ok());
    let deep = parse_type_expression_with(&options, &arena, "{!!!number}", 0);
    assert!(!deep.is_ok());
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_serialized_shape() {
    let arena = Bump::new();
    let result = parse_type_expression(&arena, "{?Array.<string>}", 0);
    let value = serde_json::to_value(result.type_expression.unwrap()).unwrap();
    assert_eq!(value["kind"], "TypeExpression");
    assert_eq!(value["pos"], 0);
    assert_eq!(value["end"], 17);
    assert_eq!(value["type"]["kind"], "NullableType");
    let reference = &value["type"]["type"];
    assert_eq!(reference["kind"], "TypeReference");
    assert_eq!(reference["type_name"]["text"], "Array");
    assert_eq!(reference["type_arguments"][0]["type_name"]["text"], "string");
}

#[test]
fn test_record_call_signature_keeps_context_parameter() {
    let arena = Bump::new();
    let TypeNode::RecordType(record) = parse_ok(&arena, "{{(this:Window, number): string}}") else {
        panic!("expected record type");
    };
    let member = &record.members[0];
    assert!(member.is_call_signature);
    let kinds: Vec<SyntaxKind> = member.parameters.iter().map(|p| p.kind()).collect();
    assert_eq!(kinds, vec![SyntaxKind::ThisType, SyntaxKind::TypeReference]);
}

#[test]
fn test_record_method_rejects_late_context_parameter() {
    assert_eq!(first_diagnostic_code("{{m(number, this:Window)}}"), 8103);
}
