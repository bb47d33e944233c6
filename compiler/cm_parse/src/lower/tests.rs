#![allow(clippy::unwrap_used, reason = "tests unwrap for concise assertions")]

use super::*;
use crate::compile;
use pretty_assertions::assert_eq;

fn pattern(source: &str) -> Pattern {
    compile(source).unwrap().pattern
}

fn err(source: &str) -> SyntaxErrorKind {
    compile(source).unwrap_err().kind
}

fn path(text: &str) -> DottedPath {
    DottedPath::parse(text).unwrap()
}

#[test]
fn fixed_sequence_of_literals() {
    assert_eq!(
        pattern("[0, 0]"),
        Pattern::FixedSequence(vec![Pattern::literal(0), Pattern::literal(0)])
    );
}

#[test]
fn variable_sequence_splits_around_star() {
    assert_eq!(
        pattern("[first, *mid, last]"),
        Pattern::VariableSequence {
            before: vec![Pattern::capture("first")],
            star: Arc::from("mid"),
            after: vec![Pattern::capture("last")],
        }
    );
    assert_eq!(
        pattern("a, *mid,"),
        Pattern::VariableSequence {
            before: vec![Pattern::capture("a")],
            star: Arc::from("mid"),
            after: vec![],
        }
    );
}

#[test]
fn names_capture_or_reference_by_case() {
    assert_eq!(pattern("point"), Pattern::capture("point"));
    assert_eq!(pattern("_"), Pattern::capture("_"));
    assert_eq!(pattern("OK"), Pattern::ValueRef(path("OK")));
    assert_eq!(pattern("Color.RED"), Pattern::ValueRef(path("Color.RED")));
    assert_eq!(pattern("http.ok"), Pattern::ValueRef(path("http.ok")));
}

#[test]
fn literals() {
    assert_eq!(pattern("None"), Pattern::Literal(Value::None));
    assert_eq!(pattern("True"), Pattern::Literal(Value::TRUE));
    assert_eq!(pattern("b'\\x00'"), Pattern::Literal(Value::bytes([0u8])));
    assert_eq!(pattern("'ogg'"), Pattern::literal("ogg"));
}

#[test]
fn or_patterns_are_flattened() {
    let expected = Pattern::Or(vec![
        Pattern::literal(1),
        Pattern::literal(2),
        Pattern::literal(3),
    ]);
    assert_eq!(pattern("(1 | 2) | 3"), expected);
    assert_eq!(pattern("1 | (2 | 3)"), expected);
}

#[test]
fn capture_as_keeps_inner_or() {
    assert_eq!(
        pattern("'north' | 'south' as direction"),
        Pattern::Or(vec![Pattern::literal("north"), Pattern::literal("south")]).bind_as("direction")
    );
}

#[test]
fn construction_preserves_argument_order() {
    assert_eq!(
        pattern("Point(0, y=y, x=x)"),
        Pattern::Construction {
            class: path("Point"),
            positional: vec![Pattern::literal(0)],
            keywords: vec![
                (Arc::from("y"), Pattern::capture("y")),
                (Arc::from("x"), Pattern::capture("x")),
            ],
        }
    );
}

#[test]
fn mapping_keys_and_rest() {
    assert_eq!(
        pattern("{'sound': url, Keys.FORMAT: 'ogg', **rest}"),
        Pattern::Mapping {
            entries: vec![
                (MappingKey::Literal(Value::string("sound")), Pattern::capture("url")),
                (MappingKey::Ref(path("Keys.FORMAT")), Pattern::literal("ogg")),
            ],
            rest: Some(Arc::from("rest")),
        }
    );
}

#[test]
fn guard_becomes_source_guard() {
    let compiled = compile("Point(x, y) if x == y").unwrap();
    assert_eq!(compiled.guard, Some(Guard::Source(Arc::from("x == y"))));
}

#[test]
fn multiple_stars_rejected() {
    assert_eq!(err("[*a, *b]"), SyntaxErrorKind::MultipleStars);
    assert_eq!(err("*a, b, *c"), SyntaxErrorKind::MultipleStars);
}

#[test]
fn duplicate_captures_rejected() {
    assert_eq!(err("[x, x]"), SyntaxErrorKind::DuplicateCapture(Arc::from("x")));
    assert_eq!(err("[x, *x]"), SyntaxErrorKind::DuplicateCapture(Arc::from("x")));
    assert_eq!(err("{'a': v, **v}"), SyntaxErrorKind::DuplicateCapture(Arc::from("v")));
    assert_eq!(err("x as x"), SyntaxErrorKind::DuplicateCapture(Arc::from("x")));
}

#[test]
fn binding_targets_must_be_capture_names() {
    let invalid = |name: &str| SyntaxErrorKind::InvalidCaptureTarget(Arc::from(name));
    assert_eq!(err("[1, 2] as Point"), invalid("Point"));
    assert_eq!(err("[*Rest]"), invalid("Rest"));
    assert_eq!(err("{'a': 1, **Rest}"), invalid("Rest"));
    assert!(compile("[1, 2] as _point").is_ok());
}

#[test]
fn wildcard_may_repeat() {
    assert!(compile("[_, _, *_]").is_ok());
    assert!(compile("Point(_, _)").is_ok());
}

#[test]
fn or_alternatives_must_bind_same_names() {
    assert_eq!(err("[x] | [y]"), SyntaxErrorKind::InconsistentOrBindings);
    assert_eq!(err("x | 1"), SyntaxErrorKind::InconsistentOrBindings);
    assert!(compile("[x, 0] | [0, x]").is_ok());
    assert!(compile("[_, x] | [x]").is_ok());
}

#[test]
fn or_bindings_count_once() {
    assert!(compile("([x] | (x,)), y").is_ok());
    assert_eq!(
        err("([x] | (x,)), x"),
        SyntaxErrorKind::DuplicateCapture(Arc::from("x"))
    );
}

#[test]
fn repeated_keyword_rejected() {
    assert_eq!(err("Point(x=1, x=2)"), SyntaxErrorKind::RepeatedKeyword(Arc::from("x")));
}

#[test]
fn duplicate_literal_mapping_keys_rejected() {
    assert_eq!(
        err("{1: a, 1.0: b}"),
        SyntaxErrorKind::DuplicateMappingKey("1.0".to_owned())
    );
}

#[test]
fn capture_mapping_key_rejected() {
    assert_eq!(err("{key: value}"), SyntaxErrorKind::InvalidMappingKey);
}

#[test]
fn error_points_at_second_binding() {
    let error = compile("[x, y, x]").unwrap_err();
    assert_eq!(error.span, Span::new(7, 8));
}

#[test]
fn display_round_trips() {
    for source in [
        "[0, 0]",
        "Point(0, y=y)",
        "{\"a\": a, **rest}",
        "[first, *mid, last]",
        "(x as y) | [x, y]",
        "1 | 2 as n",
        "Color.RED",
        "-5",
    ] {
        let first = pattern(source);
        let again = pattern(&first.to_string());
        assert_eq!(first, again, "round trip of {source}");
    }
}
