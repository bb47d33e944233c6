#![allow(clippy::unwrap_used, reason = "tests unwrap for concise assertions")]

use super::*;
use cm_eval::{MatchError, NamePosition, Scope, UnresolvedNamePolicy};
use cm_ir::Guard;
use pretty_assertions::assert_eq;

fn ints(items: &[i64]) -> Value {
    Value::list(items.iter().copied().map(Value::int).collect())
}

#[test]
fn compile_goes_through_the_cache() {
    let engine = Engine::new();
    let a = engine.compile("[x]").unwrap();
    let b = engine.compile("[x]").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(engine.cache().compilations(), 1);
}

#[test]
fn match_text_reports_syntax_errors() {
    let engine = Engine::new();
    let err = engine
        .match_text("[x, *a, *b]", &ints(&[]), &Scope::new())
        .unwrap_err();
    assert!(matches!(err, EngineError::Syntax(_)));
    assert!(err.to_string().starts_with("invalid pattern: multiple starred names"));
}

#[test]
fn matcher_uses_configured_policy() {
    let engine =
        Engine::with_config(EngineConfig::default().with_unresolved_names(UnresolvedNamePolicy::Error));
    let err = engine
        .match_text("MISSING", &Value::None, &Scope::new())
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Match(MatchError::UnresolvedName {
            name: "MISSING".to_owned(),
            position: NamePosition::Value,
        })
    );

    let lenient = Engine::new();
    assert_eq!(
        lenient.match_text("MISSING", &Value::None, &Scope::new()),
        Ok(None)
    );
}

#[test]
fn match_first_returns_first_matching_case() {
    let engine = Engine::new();
    let cases = ["[]", "[x]", "[x, *_]"];
    let scope = Scope::new();

    let (index, bindings) = engine
        .match_first(&ints(&[4, 5]), &cases, &scope)
        .unwrap()
        .unwrap();
    assert_eq!(index, 2);
    assert_eq!(bindings.get("x"), Some(&Value::int(4)));

    assert_eq!(engine.match_first(&Value::None, &cases, &scope), Ok(None));
}

#[test]
fn match_first_rejects_bad_later_case() {
    let engine = Engine::new();
    let result = engine.match_first(&Value::None, &["x", "[x, x]"], &Scope::new());
    assert!(matches!(result, Err(EngineError::Syntax(_))));
}

#[test]
fn match_first_with_guards() {
    let engine = Engine::new();
    let scope = Scope::new();
    let evaluator = |bindings: &Bindings, guard: &Guard| -> Result<bool, String> {
        match guard.to_string().as_str() {
            "x > 0" => Ok(bindings.get("x").is_some_and(|x| x.equals(&Value::int(1)))),
            other => Err(format!("cannot evaluate {other}")),
        }
    };
    let matcher = engine.matcher(&scope).with_guards(&evaluator);
    let cases = ["[x] if x > 0", "[x]"];

    let first = engine.match_first_with(&matcher, &ints(&[1]), &cases).unwrap();
    assert_eq!(first.map(|(i, _)| i), Some(0));

    let second = engine.match_first_with(&matcher, &ints(&[-1]), &cases).unwrap();
    assert_eq!(second.map(|(i, _)| i), Some(1));
}

#[test]
fn compile_case_lowers_host_expressions() {
    let engine = Engine::new();
    let test = HostExpr::BoolAnd(vec![
        HostExpr::name("c").mat_mul(HostExpr::List(vec![
            HostExpr::name("x"),
            HostExpr::name("rest").starred(),
        ])),
        HostExpr::opaque("x > 0"),
    ]);
    let compiled = engine.compile_case(&test).unwrap();
    assert_eq!(compiled.pattern, engine.compile("[x, *rest]").unwrap().pattern);
    assert!(matches!(compiled.guard, Some(Guard::Expr(_))));
    // host patterns are not cached
    assert_eq!(engine.cache().len(), 1);
}

#[test]
fn engine_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Engine>();
}
