use crate::state::StateStore;
use serde_json::{json, Value};

#[test]
fn test_set_then_get_round_trip() {
    let store = StateStore::new(json!({}));

    store.set("config.name", "demo");
    store.set("config.port", 8080);
    store.set("ready", true);

    assert_eq!(store.get("config.name"), json!("demo"));
    assert_eq!(store.get("config.port"), json!(8080));
    assert_eq!(store.get("ready"), json!(true));
}

#[test]
fn test_get_missing_path_returns_null() {
    let store = StateStore::new(json!({}));

    assert_eq!(store.get("nothing"), Value::Null);
    assert_eq!(store.get("deeply.nested.nothing"), Value::Null);

    // A present prefix with a missing tail is still just null.
    store.set("a.b", 1);
    assert_eq!(store.get("a.b.c"), Value::Null);
    assert_eq!(store.get("a.c"), Value::Null);
}

#[test]
fn test_set_creates_intermediate_objects() {
    let store = StateStore::new(json!({}));

    store.set("files.output.path", "/tmp/out");

    assert_eq!(
        store.snapshot(),
        json!({ "files": { "output": { "path": "/tmp/out" } } })
    );
}

#[test]
fn test_set_overwrites_leaf() {
    let store = StateStore::new(json!({ "count": 1 }));

    store.set("count", 2);
    assert_eq!(store.get("count"), json!(2));
}

#[test]
fn test_set_replaces_non_object_intermediate() {
    let store = StateStore::new(json!({ "slot": "scalar" }));

    store.set("slot.inner", true);
    assert_eq!(store.get("slot.inner"), json!(true));
}

#[test]
fn test_null_initial_state_becomes_empty_object() {
    let store = StateStore::new(Value::Null);

    assert_eq!(store.snapshot(), json!({}));
    store.set("k", "v");
    assert_eq!(store.get("k"), json!("v"));
}

#[test]
fn test_clones_share_the_same_tree() {
    let store = StateStore::new(json!({}));
    let handle = store.clone();

    handle.set("shared", 42);
    assert_eq!(store.get("shared"), json!(42));
}
