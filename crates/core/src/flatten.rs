// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flatten a nested script section into dotted override tokens.

use crate::encode::encode;
use crate::token::OverrideToken;
use crate::value::{Table, Value};

/// Walk `table` depth-first, in key order, emitting one token per leaf.
///
/// A selector table first emits its bare `key=marker` token, then its
/// children under the same key, so a selection always precedes the fields
/// that refine it. Empty tables emit nothing. Key text, including a leading
/// `+`, is kept as written.
///
/// A selector on `table` itself has no key to assign to and is skipped;
/// sections are validated before they get here.
pub fn flatten(table: &Table) -> Vec<OverrideToken> {
    let mut tokens = Vec::new();
    flatten_into(table, None, &mut tokens);
    tokens
}

fn flatten_into(table: &Table, prefix: Option<&str>, out: &mut Vec<OverrideToken>) {
    if let (Some(prefix), Some(selector)) = (prefix, table.selector()) {
        out.push(OverrideToken::assign(prefix, encode(selector)));
    }
    for (key, value) in table.iter() {
        let dotted = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            Value::Table(child) => flatten_into(child, Some(&dotted), out),
            leaf => out.push(OverrideToken::assign(dotted, encode(leaf))),
        }
    }
}

#[cfg(test)]
#[path = "flatten_tests.rs"]
mod tests;
