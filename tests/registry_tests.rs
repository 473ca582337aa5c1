use std::collections::BTreeMap;

use criteria::error::ContextError;
use criteria::registry::Registry;
use criteria::value::Value;

fn hash(pairs: &[(&str, Value)]) -> Value {
    let map: BTreeMap<String, Value> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    Value::from(map)
}

#[test]
fn test_resolve_unknown_name_fails() {
    let registry = Registry::new();
    assert_eq!(
        registry.resolve("free").unwrap_err(),
        ContextError::NotRegistered("free".to_string())
    );
}

#[test]
fn test_not_registered_error_message() {
    let err = Registry::new().resolve("checkout").unwrap_err();
    assert_eq!(err.to_string(), "context `checkout` is not registered");
}

#[test]
fn test_define_then_resolve() {
    let mut registry = Registry::new();
    registry.define("checkout", |c| {
        c.set("success", "Thanks for the purchase");
    });

    let checkout = registry.resolve("checkout").unwrap();
    assert_eq!(
        checkout.get("success"),
        Some(&Value::from("Thanks for the purchase"))
    );
}

#[test]
fn test_redefinition_replays_only_newest_block() {
    let mut registry = Registry::new();
    registry.define("user", |u| u.set("role", "guest"));
    registry.define("user", |u| u.set("role", "admin"));

    let user = registry.resolve("user").unwrap();
    assert_eq!(user.get("role"), Some(&Value::from("admin")));
    assert_eq!(user.get("guest"), None);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_resolve_does_not_mutate_registry() {
    let mut registry = Registry::new();
    registry.define("user", |u| u.set("role", "guest"));
    let before: Vec<String> = registry.names().map(str::to_string).collect();

    registry.resolve("user").unwrap();
    registry.resolve("missing").unwrap_err();

    let after: Vec<String> = registry.names().map(str::to_string).collect();
    assert_eq!(before, after);
}

#[test]
fn test_repeated_resolution_yields_independent_records() {
    let mut registry = Registry::new();
    registry.define("user", |u| {
        u.set("name", "ada");
        u.set("logins", 1);
    });

    let mut first = registry.resolve("user").unwrap();
    let second = registry.resolve("user").unwrap();
    assert_eq!(first.to_json(), second.to_json());

    first.set("logins", 42);
    assert_eq!(first.get("logins"), Some(&Value::Integer(42)));
    assert_eq!(second.get("logins"), Some(&Value::Integer(1)));
}

#[test]
fn test_configure_scope_merges_contexts() {
    let mut registry = Registry::new();
    registry.configure(|define| {
        define.context("checkout", |c| c.set("success", "Thanks"));
        define.context("show", |s| s.set("a", "name"));
    });

    assert_eq!(registry.len(), 2);
    assert!(registry.contains("checkout"));
    assert!(registry.contains("show"));
}

#[test]
fn test_configure_last_entry_wins() {
    let mut registry = Registry::new();
    registry.define("user", |u| u.set("role", "guest"));
    registry.configure(|define| {
        define.context("user", |u| u.set("role", "member"));
        define.context("user", |u| u.set("role", "admin"));
    });

    let user = registry.resolve("user").unwrap();
    assert_eq!(user.get("role"), Some(&Value::from("admin")));
}

#[test]
fn test_show_context_end_to_end() {
    let mut registry = Registry::new();
    registry.configure(|define| {
        define.context("show", |b| {
            b.set("b", "c");
            b.set("a", "name");
            b.set(
                "c",
                vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)],
            );
            b.declare("d", |d| {
                d.set("c", hash(&[("some", Value::from("value"))]));
            });
        });
    });

    let show = registry.resolve("show").unwrap();
    assert_eq!(show.get("b"), Some(&Value::from("c")));
    assert_eq!(show.get("a"), Some(&Value::from("name")));
    assert_eq!(
        show.get("c"),
        Some(&Value::from(vec![
            Value::Integer(1),
            Value::Integer(2),
            Value::Integer(3),
        ]))
    );

    let d = show.nested("d").unwrap();
    assert_eq!(d.get("c"), Some(&hash(&[("some", Value::from("value"))])));

    assert_eq!(
        registry.resolve("missing").unwrap_err(),
        ContextError::NotRegistered("missing".to_string())
    );
}
