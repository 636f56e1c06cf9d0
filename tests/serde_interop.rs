//! `Value` crosses into serde-based formats and back.

use incjson::{json, Value};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[test]
fn value_to_serde_json_text() {
    let v = json!({"b": [1, null, "x"], "a": true});
    let text = serde_json::to_string(&v).unwrap();
    // sorted key order carries over
    assert_eq!(text, r#"{"a":true,"b":[1,null,"x"]}"#);
}

#[test]
fn value_from_serde_json_text() {
    let v: Value = serde_json::from_str(r#"{"z": 1, "a": {"k": [true, 2.5]}}"#).unwrap();
    assert_eq!(v.keys()[0].key.as_str(), "a");
    assert!(v["a"]["k"][0].get_bool());
    assert_eq!(v["a"]["k"][1].get_f64(), 2.5);
    assert_eq!(v["z"].get_i64(), 1);
}

#[test]
fn undefined_entries_are_skipped_like_text() {
    let v = json!({"a": 1, "b": undefined});
    assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"a":1}"#);
}

#[test]
fn number_texts_cross_as_numbers() {
    let v = json!([(Value::number_str("42")), (Value::number_str("2.5"))]);
    assert_eq!(serde_json::to_string(&v).unwrap(), "[42,2.5]");
}

#[test]
fn typed_struct_round_trip() {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        active: true,
        tags: vec!["admin".to_string(), "ops".to_string()],
    };
    // struct -> serde_json text -> Value -> serde_json text -> struct
    let text = serde_json::to_string(&user).unwrap();
    let v: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["name"].get_string(), "Alice");
    let back: User = serde_json::from_str(&serde_json::to_string(&v).unwrap()).unwrap();
    assert_eq!(back, user);
}
