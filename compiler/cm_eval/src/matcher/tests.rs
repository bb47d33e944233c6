#![allow(clippy::unwrap_used, reason = "tests unwrap for concise assertions")]

use super::*;
use std::cell::RefCell;
use std::sync::Arc;

use cm_ir::{BuiltinType, Class, ClassRef, Guard, Record};
use pretty_assertions::assert_eq;

use crate::Scope;

fn compile(source: &str) -> CompiledPattern {
    cm_parse::compile(source).unwrap()
}

fn ints(items: &[i64]) -> Value {
    Value::list(items.iter().copied().map(Value::int).collect())
}

fn bindings(pairs: &[(&str, Value)]) -> Bindings {
    pairs
        .iter()
        .map(|(name, value)| (Arc::from(*name), value.clone()))
        .collect()
}

fn point_class() -> ClassRef {
    Class::builder("geometry", "Point").match_args(["x", "y"]).build()
}

fn point(class: &ClassRef, x: i64, y: i64) -> Value {
    Value::object(Record::new(
        Arc::clone(class),
        [("x", Value::int(x)), ("y", Value::int(y))],
    ))
}

fn run(source: &str, value: &Value, scope: &Scope) -> Result<Option<Bindings>, MatchError> {
    let registry = FieldRegistry::new();
    Matcher::new(&registry, scope).match_pattern(&compile(source), value)
}

fn matches(source: &str, value: &Value) -> Option<Bindings> {
    run(source, value, &Scope::with_builtins()).unwrap()
}

#[test]
fn capture_binds_whole_value() {
    assert_eq!(
        matches("x", &Value::int(3)),
        Some(bindings(&[("x", Value::int(3))]))
    );
    assert_eq!(
        matches("_", &Value::None),
        Some(bindings(&[("_", Value::None)]))
    );
}

#[test]
fn singleton_literals_match_by_identity() {
    assert!(matches("True", &Value::TRUE).is_some());
    assert!(matches("True", &Value::int(1)).is_none());
    assert!(matches("None", &Value::FALSE).is_none());
    assert!(matches("1", &Value::TRUE).is_some());
    assert!(matches("1", &Value::float(1.0)).is_some());
    assert!(matches("'a'", &Value::string("a")).is_some());
    assert!(matches("b'a'", &Value::string("a")).is_none());
}

#[test]
fn fixed_sequences() {
    assert_eq!(matches("[0, 0]", &ints(&[0, 0])), Some(Bindings::default()));
    assert!(matches("[0, 0]", &ints(&[0, 0, 0])).is_none());
    assert!(matches("(a, b)", &Value::tuple(vec![Value::int(1), Value::int(2)])).is_some());
    assert!(matches("[a]", &Value::string("a")).is_none());
}

#[test]
fn empty_fixed_sequence_matches_only_empty() {
    assert!(matches("[]", &ints(&[])).is_some());
    assert!(matches("()", &Value::tuple(vec![])).is_some());
    assert!(matches("[]", &ints(&[1])).is_none());
    assert!(matches("[]", &Value::map([])).is_none());
}

#[test]
fn star_with_empty_tail_takes_the_rest() {
    assert_eq!(
        matches("[a, *mid, ]", &ints(&[1, 2, 3])),
        Some(bindings(&[("a", Value::int(1)), ("mid", ints(&[2, 3]))]))
    );
}

#[test]
fn star_alone_binds_a_copy_as_list() {
    let tuple = Value::tuple(vec![Value::int(1), Value::int(2)]);
    assert_eq!(
        matches("[*all]", &tuple),
        Some(bindings(&[("all", ints(&[1, 2]))]))
    );
}

#[test]
fn star_in_the_middle() {
    assert_eq!(
        matches("[first, *mid, last]", &ints(&[1, 2])),
        Some(bindings(&[
            ("first", Value::int(1)),
            ("mid", ints(&[])),
            ("last", Value::int(2)),
        ]))
    );
    assert!(matches("[first, *mid, last]", &ints(&[1])).is_none());
}

#[test]
fn or_is_left_biased() {
    assert_eq!(
        matches("[x, 0] | [0, x]", &ints(&[0, 0])),
        Some(bindings(&[("x", Value::int(0))]))
    );
    assert_eq!(
        matches("(x as y) | [x, y]", &ints(&[1, 2])),
        Some(bindings(&[("x", ints(&[1, 2])), ("y", ints(&[1, 2]))]))
    );
}

#[test]
fn failed_alternative_leaves_no_bindings() {
    let pattern = Pattern::Or(vec![
        Pattern::FixedSequence(vec![Pattern::capture("a"), Pattern::literal(1)]),
        Pattern::FixedSequence(vec![Pattern::capture("_"), Pattern::capture("b")]),
    ]);
    let registry = FieldRegistry::new();
    let scope = Scope::new();
    assert_eq!(
        Matcher::new(&registry, &scope).match_tree(&pattern, &ints(&[5, 2])),
        Ok(Some(bindings(&[("_", Value::int(5)), ("b", Value::int(2))])))
    );
}

#[test]
fn capture_as() {
    assert_eq!(
        matches("'north' | 'south' as direction", &Value::string("south")),
        Some(bindings(&[("direction", Value::string("south"))]))
    );
    assert!(matches("'north' | 'south' as d", &Value::string("east")).is_none());
}

#[test]
fn mapping_rest_collects_unlisted_keys() {
    let value = Value::map([
        (Value::string("a"), Value::int(1)),
        (Value::string("b"), Value::int(2)),
        (Value::string("c"), Value::int(3)),
    ]);
    let expected_rest = Value::map([
        (Value::string("b"), Value::int(2)),
        (Value::string("c"), Value::int(3)),
    ]);
    assert_eq!(
        matches("{'a': a, **rest}", &value),
        Some(bindings(&[("a", Value::int(1)), ("rest", expected_rest)]))
    );
}

#[test]
fn mapping_ignores_extra_keys_and_requires_listed_ones() {
    let value = Value::map([
        (Value::string("sound"), Value::string("a.ogg")),
        (Value::string("format"), Value::string("ogg")),
        (Value::string("extra"), Value::None),
    ]);
    assert_eq!(
        matches("{'sound': url, 'format': 'ogg'}", &value),
        Some(bindings(&[("url", Value::string("a.ogg"))]))
    );
    assert!(matches("{'missing': _}", &value).is_none());
    assert!(matches("{}", &ints(&[])).is_none());
}

#[test]
fn mapping_rest_excludes_numerically_equal_key() {
    let value = Value::map([
        (Value::int(1), Value::string("one")),
        (Value::int(2), Value::string("two")),
    ]);
    assert_eq!(
        matches("{1.0: v, **rest}", &value),
        Some(bindings(&[
            ("v", Value::string("one")),
            ("rest", Value::map([(Value::int(2), Value::string("two"))])),
        ]))
    );
}

#[test]
fn value_refs_resolve_through_attributes() {
    let color = Class::builder("colors", "Color").build();
    color.set_attr("RED", Value::int(1));
    let scope = Scope::new()
        .with_class(&color)
        .with("http", Value::namespace([("OK", Value::int(200))]));
    assert!(run("Color.RED", &Value::int(1), &scope).unwrap().is_some());
    assert!(run("Color.RED", &Value::int(2), &scope).unwrap().is_none());
    assert!(run("http.OK", &Value::int(200), &scope).unwrap().is_some());
}

#[test]
fn unresolved_value_ref_follows_policy() {
    let registry = FieldRegistry::new();
    let scope = Scope::new();
    let pattern = compile("Missing.NAME");

    let lenient = Matcher::new(&registry, &scope);
    assert_eq!(lenient.match_pattern(&pattern, &Value::None), Ok(None));

    let strict = Matcher::new(&registry, &scope).with_policy(UnresolvedNamePolicy::Error);
    assert_eq!(
        strict.match_pattern(&pattern, &Value::None),
        Err(MatchError::UnresolvedName {
            name: "Missing.NAME".to_owned(),
            position: NamePosition::Value,
        })
    );

    let key = compile("{Keys.A: _}");
    assert_eq!(
        strict.match_pattern(&key, &Value::map([])),
        Err(MatchError::UnresolvedName {
            name: "Keys.A".to_owned(),
            position: NamePosition::MappingKey,
        })
    );
}

#[test]
fn construction_with_keywords() {
    let class = point_class();
    let scope = Scope::new().with_class(&class);
    assert_eq!(
        run("Point(x=0, y=y)", &point(&class, 0, 5), &scope).unwrap(),
        Some(bindings(&[("y", Value::int(5))]))
    );
    assert_eq!(
        run("Point(x=0, y=y)", &point(&class, 5, 5), &scope).unwrap(),
        None
    );
}

#[test]
fn construction_checks_instance_type() {
    let class = point_class();
    let other = Class::builder("geometry", "Vector").match_args(["x", "y"]).build();
    let scope = Scope::new().with_class(&class);
    assert_eq!(run("Point()", &point(&other, 0, 0), &scope).unwrap(), None);
    assert_eq!(run("Point()", &Value::int(0), &scope).unwrap(), None);
}

#[test]
fn construction_accepts_subclasses() {
    let base = point_class();
    let derived = Class::builder("geometry", "Point3").base(Arc::clone(&base)).build();
    let scope = Scope::new().with_class(&base);
    let value = Value::object(
        Record::new(derived, [("x", Value::int(1)), ("y", Value::int(2))])
            .with_attr("z", Value::int(3)),
    );
    assert_eq!(
        run("Point(a, b)", &value, &scope).unwrap(),
        Some(bindings(&[("a", Value::int(1)), ("b", Value::int(2))]))
    );
}

#[test]
fn construction_arity_is_fatal() {
    let class = point_class();
    let scope = Scope::new().with_class(&class);
    assert_eq!(
        run("Point(1, 2, 3)", &point(&class, 1, 2), &scope),
        Err(MatchError::TooManyPositional {
            class: "Point".to_owned(),
            expected: 2,
            given: 3,
        })
    );
}

#[test]
fn construction_missing_field_fails() {
    let class = point_class();
    let scope = Scope::new().with_class(&class);
    let value = Value::object(Record::new(Arc::clone(&class), [("x", Value::int(1))]));
    assert_eq!(run("Point(x, y)", &value, &scope), Ok(None));
}

#[test]
fn construction_type_resolution_is_fatal() {
    let scope = Scope::new().with("point", Value::int(0));
    assert_eq!(
        run("Missing()", &Value::None, &scope),
        Err(MatchError::UnresolvedName {
            name: "Missing".to_owned(),
            position: NamePosition::Type,
        })
    );
    assert_eq!(
        run("point()", &Value::None, &scope),
        Err(MatchError::NotAType {
            path: "point".to_owned(),
            found: "int".to_owned(),
        })
    );
}

#[test]
fn builtin_constructions_bind_self() {
    assert_eq!(
        matches("str(s)", &Value::string("hi")),
        Some(bindings(&[("s", Value::string("hi"))]))
    );
    assert!(matches("str(s)", &Value::int(1)).is_none());
    assert!(matches("int(n)", &Value::TRUE).is_some());
    assert!(matches("int(0)", &Value::int(0)).is_some());
    assert!(matches("dict()", &Value::map([])).is_some());
}

#[test]
fn construction_stops_at_first_failing_field() {
    let class = point_class();
    let calls = RefCell::new(Vec::new());
    let resolver = |name: &str| {
        calls.borrow_mut().push(name.to_owned());
        match name {
            "Point" => Some(Value::class(Arc::clone(&class))),
            _ => Some(Value::int(99)),
        }
    };
    let registry = FieldRegistry::new();
    let matcher = Matcher::new(&registry, &resolver);
    let result = matcher
        .match_pattern(&compile("Point(0, LATER)"), &point(&class, 1, 2))
        .unwrap();
    assert_eq!(result, None);
    assert_eq!(*calls.borrow(), vec!["Point".to_owned()]);
}

#[test]
fn mapping_checks_keys_in_source_order() {
    let calls = RefCell::new(Vec::new());
    let resolver = |name: &str| {
        calls.borrow_mut().push(name.to_owned());
        match name {
            "Keys" => Some(Value::namespace([("B", Value::string("b"))])),
            _ => Some(Value::int(2)),
        }
    };
    let registry = FieldRegistry::new();
    let matcher = Matcher::new(&registry, &resolver);
    let value = Value::map([(Value::string("a"), Value::int(1))]);

    // An absent key fails before its value pattern or any later key runs.
    let absent = compile("{'missing': LATER, Keys.B: v}");
    assert_eq!(matcher.match_pattern(&absent, &value).unwrap(), None);
    assert!(calls.borrow().is_empty());

    // A present key's value pattern runs before the next key is looked up.
    let mismatch = compile("{'a': LATER, Keys.B: v}");
    assert_eq!(matcher.match_pattern(&mismatch, &value).unwrap(), None);
    assert_eq!(*calls.borrow(), vec!["LATER".to_owned()]);
}

#[test]
fn mapping_reference_keys_resolve_at_match_time() {
    let scope = Scope::new().with(
        "Keys",
        Value::namespace([("A", Value::string("a")), ("B", Value::string("b"))]),
    );
    let value = Value::map([
        (Value::string("a"), Value::int(1)),
        (Value::string("c"), Value::int(3)),
    ]);
    assert_eq!(
        run("{Keys.A: v, **rest}", &value, &scope).unwrap(),
        Some(bindings(&[
            ("v", Value::int(1)),
            ("rest", Value::map([(Value::string("c"), Value::int(3))])),
        ]))
    );
    assert_eq!(run("{Keys.B: v}", &value, &scope).unwrap(), None);
}

#[test]
fn or_skips_later_alternatives() {
    let calls = RefCell::new(0);
    let resolver = |_: &str| {
        *calls.borrow_mut() += 1;
        Some(Value::int(1))
    };
    let registry = FieldRegistry::new();
    let matcher = Matcher::new(&registry, &resolver);
    assert!(matcher
        .match_pattern(&compile("1 | A | B"), &Value::int(1))
        .unwrap()
        .is_some());
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn guards_run_after_structural_success() {
    let registry = FieldRegistry::new();
    let scope = Scope::new();
    let seen = RefCell::new(Vec::new());
    let evaluator = |bindings: &Bindings, guard: &Guard| -> Result<bool, String> {
        seen.borrow_mut().push(guard.to_string());
        Ok(bindings.get("x") == Some(&Value::int(1)))
    };
    let matcher = Matcher::new(&registry, &scope).with_guards(&evaluator);
    let pattern = compile("[x] if x == 1");

    assert!(matcher.match_pattern(&pattern, &ints(&[1])).unwrap().is_some());
    assert_eq!(matcher.match_pattern(&pattern, &ints(&[2])).unwrap(), None);
    assert_eq!(matcher.match_pattern(&pattern, &ints(&[])).unwrap(), None);
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn guard_errors() {
    let registry = FieldRegistry::new();
    let scope = Scope::new();
    let pattern = compile("x if x");
    assert_eq!(
        Matcher::new(&registry, &scope).match_pattern(&pattern, &Value::None),
        Err(MatchError::MissingGuardEvaluator {
            guard: "x".to_owned(),
        })
    );

    let failing = |_: &Bindings, _: &Guard| -> Result<bool, String> { Err("boom".to_owned()) };
    assert_eq!(
        Matcher::new(&registry, &scope)
            .with_guards(&failing)
            .match_pattern(&pattern, &Value::None),
        Err(MatchError::Guard {
            message: "boom".to_owned(),
        })
    );
}

#[test]
fn deeply_nested_patterns_do_not_overflow() {
    let depth = 2_000;
    let mut value = Value::int(7);
    for _ in 0..depth {
        value = Value::list(vec![value]);
    }
    let mut nested = Pattern::capture("x");
    for _ in 0..depth {
        nested = Pattern::FixedSequence(vec![nested]);
    }
    let registry = FieldRegistry::new();
    let scope = Scope::new();
    let result = Matcher::new(&registry, &scope)
        .match_tree(&nested, &value)
        .unwrap();
    assert_eq!(result, Some(bindings(&[("x", Value::int(7))])));
}

#[test]
fn policy_parses_from_text() {
    assert_eq!("fail".parse(), Ok(UnresolvedNamePolicy::Fail));
    assert_eq!(" Error ".parse(), Ok(UnresolvedNamePolicy::Error));
    assert!("strict".parse::<UnresolvedNamePolicy>().is_err());
}

#[test]
fn builtin_types_resolve_by_name() {
    assert_eq!(
        Scope::with_builtins().resolve("list"),
        Some(Value::builtin(BuiltinType::List))
    );
}

mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn fixed_sequence_requires_exact_length(items in prop::collection::vec(-3i64..3, 0..6)) {
            let got = matches("[a, b, c]", &ints(&items));
            prop_assert_eq!(got.is_some(), items.len() == 3);
        }

        #[test]
        fn star_segment_takes_the_middle(
            items in prop::collection::vec(-3i64..3, 0..8),
        ) {
            let got = matches("[a, *mid, b, c]", &ints(&items));
            if items.len() < 3 {
                prop_assert_eq!(got, None);
            } else {
                let got = got.unwrap();
                prop_assert_eq!(&got["mid"], &ints(&items[1..items.len() - 2]));
                prop_assert_eq!(&got["c"], &Value::int(items[items.len() - 1]));
            }
        }

        #[test]
        fn literal_matches_only_equal_ints(a in -5i64..5, b in -5i64..5) {
            let got = matches(&a.to_string(), &Value::int(b));
            prop_assert_eq!(got.is_some(), a == b);
        }
    }
}
