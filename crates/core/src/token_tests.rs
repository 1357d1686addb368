// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    assign = { OverrideToken::assign("optimizer.lr", "0.1"), Some("optimizer.lr"), Some("0.1") },
    literal_pair = { OverrideToken::literal("seed=3=4"), Some("seed"), Some("3=4") },
    literal_flag = { OverrideToken::literal("--debug"), None, None },
)]
fn key_and_value(token: OverrideToken, key: Option<&str>, value: Option<&str>) {
    assert_eq!(token.key(), key);
    assert_eq!(token.value(), value);
}

#[test]
fn join_keeps_order_and_duplicates() {
    let tokens = [
        OverrideToken::assign("foo.bar", "1"),
        OverrideToken::literal("foo.bar=21"),
        OverrideToken::literal("--flag"),
    ];
    assert_eq!(join_tokens(&tokens), "foo.bar=1 foo.bar=21 --flag");
    assert_eq!(join_tokens(&[]), "");
}

#[test]
fn serializes_as_its_text() {
    let json = serde_json::to_string(&[OverrideToken::assign("a.b", "x y")]).unwrap();
    assert_eq!(json, r#"["a.b=x y"]"#);
}
