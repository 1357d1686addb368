// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scalar encoding for the right-hand side of `key=value` override tokens.
//!
//! The consumer of the tokens is a Python-side configuration system, so
//! null, booleans and floats are spelled the way Python prints them.
//! Strings are emitted verbatim: no quoting and no escaping.

use crate::value::{Number, Value};
use std::fmt;

/// Encode a value as override-token text.
///
/// Sequences and tables encode in flow form (`[a, b]`, `{k: v}`) and are left
/// for the consumer to parse.
pub fn encode(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => {
            let parts: Vec<String> = items.iter().map(encode).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Table(table) => {
            let mut parts = Vec::with_capacity(table.len() + 1);
            if let Some(selector) = table.selector() {
                parts.push(format!("{}: {}", crate::MARKER_KEY, encode(selector)));
            }
            for (key, value) in table.iter() {
                parts.push(format!("{}: {}", key, encode(value)));
            }
            format!("{{{}}}", parts.join(", "))
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            Number::UInt(n) => write!(f, "{n}"),
            Number::Float(n) => f.write_str(&format_float(*n)),
        }
    }
}

/// Python `repr` of a float: shortest round-trip digits, scientific notation
/// when the decimal exponent is below -4 or at least 16, and a trailing `.0`
/// on integral values.
fn format_float(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sci = format!("{n:e}");
    let exponent = sci
        .split_once('e')
        .and_then(|(_, exp)| exp.parse::<i32>().ok())
        .unwrap_or(0);

    if exponent < -4 || exponent >= 16 {
        match sci.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exp),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => sci,
        }
    } else {
        let plain = n.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    }
}

#[cfg(test)]
#[path = "encode_tests.rs"]
mod tests;
