// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submission-script template rendering
//!
//! Templates use `{name}` placeholders; `{{` and `}}` stand for literal braces.
//! Shell variables written as `$VAR` or `${VAR}` pass through untouched.

use indexmap::IndexMap;
use ml_core::{encode, Table, Value};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Regex pattern for `{name}` placeholders, doubled-brace escapes and
/// `${VAR}` shell references (matched first so they are kept verbatim)
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
pub static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{\w+\}|\{\{|\}\}|\{(\w+)\}").expect("constant regex pattern is valid")
});

/// Values computed per job rather than authored: resolved paths, checkout
/// snippet, script arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedFields(IndexMap<String, String>);

impl DerivedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

/// Errors from rendering a template for one job
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("unresolved template placeholder(s): {}", .0.join(", "))]
    Unresolved(Vec<String>),
    #[error("template field `{name}` must be a scalar, found a {kind}")]
    NotScalar { name: String, kind: &'static str },
}

/// Distinct placeholder names, in order of first appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_PATTERN.captures_iter(template) {
        if let Some(name) = caps.get(1) {
            if !names.iter().any(|n| n == name.as_str()) {
                names.push(name.as_str().to_string());
            }
        }
    }
    names
}

/// Fill `template` for one job.
///
/// Lookup order: `derived`, then the job's `slurm` fields, then `defaults`.
/// Null renders as an empty string so that the matching `#SBATCH` line is
/// dropped by [`clean_sbatch_params`], which runs on the result.
pub fn render(
    template: &str,
    slurm: &Table,
    derived: &DerivedFields,
    defaults: &Table,
) -> Result<String, RenderError> {
    let mut unresolved: Vec<String> = Vec::new();
    let mut not_scalar: Option<RenderError> = None;

    let rendered = PLACEHOLDER_PATTERN.replace_all(template, |caps: &regex::Captures| {
        let Some(name) = caps.get(1).map(|m| m.as_str()) else {
            return match &caps[0] {
                "{{" => "{".to_string(),
                "}}" => "}".to_string(),
                shell => shell.to_string(),
            };
        };
        if let Some(value) = derived.get(name) {
            return value.to_string();
        }
        match slurm.get(name).or_else(|| defaults.get(name)) {
            Some(Value::Null) => String::new(),
            Some(value) if value.is_scalar() => encode(value),
            Some(value) => {
                not_scalar.get_or_insert(RenderError::NotScalar {
                    name: name.to_string(),
                    kind: value.kind(),
                });
                String::new()
            }
            None => {
                if !unresolved.iter().any(|n| n == name) {
                    unresolved.push(name.to_string());
                }
                String::new()
            }
        }
    });

    if !unresolved.is_empty() {
        return Err(RenderError::Unresolved(unresolved));
    }
    if let Some(err) = not_scalar {
        return Err(err);
    }
    Ok(clean_sbatch_params(&rendered))
}

/// Remove `#SBATCH --flag=` lines whose value is empty.
pub fn clean_sbatch_params(text: &str) -> String {
    let mut kept: Vec<&str> = text
        .lines()
        .filter(|line| {
            if !line.starts_with("#SBATCH") {
                return true;
            }
            line.split('=').nth(1).is_none_or(|value| !value.trim().is_empty())
        })
        .collect();
    if text.ends_with('\n') {
        kept.push("");
    }
    kept.join("\n")
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
