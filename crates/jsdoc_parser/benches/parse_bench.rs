use bumpalo::Bump;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jsdoc_parser::{find_doc_comments, parse_doc_comment, parse_type_expression};

// A source file with a handful of typical Closure-annotated declarations.
const ANNOTATED_SOURCE: &str = r#"
/**
 * A registry of users keyed by id.
 * @typedef UserRecord
 * @type {Object}
 * @property {number} id
 * @property {string} name
 * @property {?Array.<string>} tags
 */

/**
 * Looks up a user.
 * @param {!Object.<number, UserRecord>} registry The registry to search.
 * @param {number} id
 * @param {{strict: boolean, fallback: ?UserRecord}=} [options]
 * @return {?UserRecord} The matching record, or null.
 */
function findUser(registry, id, options) {}

/**
 * @template K, V
 * @param {function(this:Map, K, V): boolean} predicate
 * @param {...(K|V)} rest
 * @returns {Array.<[K, V]>}
 */
function filterEntries(predicate, rest) {}

/** @type {function(new:Error, string=): undefined} */
var makeError;
"#;

const TYPE_EXPRESSIONS: &[&str] = &[
    "{?number}",
    "{Array.<string>}",
    "{function(this:Window, ...number): boolean}",
    "{{name: string, age: number, greet(): string}}",
    "{(number|string|null)}",
    "{[number, string, boolean]}",
];

fn bench_type_expressions(c: &mut Criterion) {
    c.bench_function("parse_type_expressions", |b| {
        b.iter(|| {
            let arena = Bump::new();
            for source in TYPE_EXPRESSIONS {
                let result = parse_type_expression(&arena, black_box(source), 0);
                black_box(result.type_expression);
            }
        })
    });
}

fn bench_doc_comments(c: &mut Criterion) {
    let ranges = find_doc_comments(ANNOTATED_SOURCE);
    c.bench_function("parse_doc_comments", |b| {
        b.iter(|| {
            let arena = Bump::new();
            for range in &ranges {
                let result = parse_doc_comment(
                    &arena,
                    black_box(ANNOTATED_SOURCE),
                    range.pos as usize,
                    range.len() as usize,
                );
                black_box(result.map(|r| r.comment));
            }
        })
    });
}

fn bench_find_doc_comments(c: &mut Criterion) {
    c.bench_function("find_doc_comments", |b| {
        b.iter(|| find_doc_comments(black_box(ANNOTATED_SOURCE)))
    });
}

criterion_group!(benches, bench_type_expressions, bench_doc_comments, bench_find_doc_comments);
criterion_main!(benches);
