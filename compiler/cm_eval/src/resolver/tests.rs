use super::*;
use cm_ir::Class;

#[test]
fn builtins_are_types() {
    let scope = Scope::with_builtins();
    assert_eq!(scope.len(), BuiltinType::ALL.len());
    assert_eq!(scope.resolve("str"), Some(Value::builtin(BuiltinType::Str)));
    assert_eq!(scope.resolve("Point"), None);
}

#[test]
fn classes_bind_under_their_name() {
    let point = Class::builder("geometry", "Point").record(["x", "y"]).build();
    let scope = Scope::new().with_class(&point).with("ORIGIN", Value::int(0));
    assert_eq!(scope.resolve("Point"), Some(Value::class(point)));
    assert_eq!(scope.get("ORIGIN"), Some(&Value::int(0)));
}

#[test]
fn later_insert_wins() {
    let mut scope = Scope::new();
    scope.insert("x", Value::int(1)).insert("x", Value::int(2));
    assert_eq!(scope.resolve("x"), Some(Value::int(2)));
}

#[test]
fn closures_resolve() {
    let resolver = |name: &str| (name == "ANSWER").then(|| Value::int(42));
    assert_eq!(resolver.resolve("ANSWER"), Some(Value::int(42)));
    assert_eq!(resolver.resolve("QUESTION"), None);
}
