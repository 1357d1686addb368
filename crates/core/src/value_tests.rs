// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn yaml(text: &str) -> Value {
    serde_yaml::from_str(text).unwrap()
}

#[test]
fn parses_nested_mapping_in_file_order() {
    let value = yaml("zeta: 1\nalpha:\n  b: 2\n  a: 3\nmid: x\n");
    let table = value.as_table().unwrap();
    assert_eq!(table.keys().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);
    let alpha = table.get("alpha").unwrap().as_table().unwrap();
    assert_eq!(alpha.keys().collect::<Vec<_>>(), ["b", "a"]);
}

#[test]
fn marker_key_becomes_selector() {
    let value = yaml("gflownet:\n  policy: {}\n  __value__: flowmatch\n");
    let gflownet = value.as_table().unwrap().get("gflownet").unwrap().as_table().unwrap();
    assert!(gflownet.is_selector());
    assert_eq!(gflownet.selector(), Some(&Value::from("flowmatch")));
    assert!(!gflownet.contains_key(MARKER_KEY));
    assert_eq!(gflownet.len(), 1);
}

#[yare::parameterized(
    null    = { "k: null",  Value::Null },
    tilde   = { "k: ~",     Value::Null },
    boolean = { "k: true",  Value::Bool(true) },
    int     = { "k: 128",   Value::Number(Number::Int(128)) },
    float   = { "k: 0.5",   Value::Number(Number::Float(0.5)) },
    string  = { "k: $USER", Value::String("$USER".into()) },
)]
fn parses_scalars(text: &str, expected: Value) {
    assert_eq!(yaml(text).as_table().unwrap().get("k"), Some(&expected));
}

#[yare::parameterized(
    boolean = { "true: a",  "True" },
    int     = { "3: a",     "3" },
    null    = { "~: a",     "None" },
)]
fn non_string_keys_are_stringified(text: &str, key: &str) {
    assert!(yaml(text).as_table().unwrap().contains_key(key));
}

#[test]
fn duplicate_marker_is_rejected() {
    let err = serde_yaml::from_str::<Value>("a:\n  __value__: x\n  __value__: y\n").unwrap_err();
    assert!(err.to_string().contains("duplicate"), "{err}");
}

#[test]
fn json_and_yaml_parse_into_same_tree() {
    let from_json: Value = serde_json::from_str(r#"{"a": {"__value__": "x", "b": 1}}"#).unwrap();
    let from_yaml = yaml("a:\n  __value__: x\n  b: 1\n");
    assert_eq!(from_json, from_yaml);
}

#[test]
fn table_from_null_is_empty() {
    let table: Table = serde_yaml::from_str("~").unwrap();
    assert!(table.is_empty());
}

#[test]
fn table_from_scalar_is_an_error() {
    let err = serde_yaml::from_str::<Table>("3").unwrap_err();
    assert!(err.to_string().contains("expected a mapping"), "{err}");
}

#[test]
fn insert_keeps_position_of_existing_key() {
    let mut table: Table = [("a", 1i64), ("b", 2), ("c", 3)].into_iter().collect();
    table.insert("a", 10i64);
    assert_eq!(table.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
    assert_eq!(table.get("a"), Some(&Value::from(10i64)));
}

#[test]
fn remove_preserves_remaining_order() {
    let mut table: Table = [("a", 1i64), ("b", 2), ("c", 3)].into_iter().collect();
    table.remove("b");
    assert_eq!(table.keys().collect::<Vec<_>>(), ["a", "c"]);
}

#[test]
fn serialize_writes_selector_first() {
    let value = yaml("a:\n  b: 1\n  __value__: x\n");
    let json = serde_json::to_string(&value).unwrap();
    assert_eq!(json, r#"{"a":{"__value__":"x","b":1}}"#);
}

#[test]
fn empty_table_vs_selector_only() {
    let mut table = Table::new();
    assert!(table.is_empty());
    table.set_selector("x");
    assert!(!table.is_empty());
    assert_eq!(table.len(), 0);
}
