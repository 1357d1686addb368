// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Override tokens appended to the launched program's command line.

use serde::{Serialize, Serializer};
use std::fmt;

/// A single `dotted.key=value` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideToken {
    /// Produced by flattening a script section.
    Assign { key: String, value: String },
    /// Passed through verbatim from the command line.
    Literal(String),
}

impl OverrideToken {
    pub fn assign(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Assign { key: key.into(), value: value.into() }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Dotted key of the token. Literals are split on their first `=`.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Assign { key, .. } => Some(key),
            Self::Literal(text) => text.split_once('=').map(|(key, _)| key),
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Assign { value, .. } => Some(value),
            Self::Literal(text) => text.split_once('=').map(|(_, value)| value),
        }
    }
}

impl fmt::Display for OverrideToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign { key, value } => write!(f, "{key}={value}"),
            Self::Literal(text) => f.write_str(text),
        }
    }
}

impl Serialize for OverrideToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Join tokens into the argument string placed after the script path.
pub fn join_tokens(tokens: &[OverrideToken]) -> String {
    tokens.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
