// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job entry shape: the `slurm` and `script` sections.

use ml_core::{Table, Value, MARKER_KEY};
use thiserror::Error;

pub const SLURM_SECTION: &str = "slurm";
pub const SCRIPT_SECTION: &str = "script";

/// One layer of a job definition.
///
/// ```yaml
/// slurm:
///   partition: long
///   mem: 32G
/// script:
///   gflownet:
///     __value__: flowmatch
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobSpec {
    /// Scheduler fields, rendered into the template. Shallow.
    pub slurm: Table,
    /// Arguments of the launched program, flattened into override tokens.
    pub script: Table,
}

/// Shape errors in a job entry or the shared section
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    #[error("expected a mapping with `slurm` and/or `script`, found a {0}")]
    NotAMapping(&'static str),
    #[error("unknown section `{0}` (expected `slurm` or `script`)")]
    UnknownSection(String),
    #[error("`{section}` must be a mapping, found a {kind}")]
    SectionNotAMapping { section: &'static str, kind: &'static str },
    #[error("`slurm.{key}` must be a scalar, found a {kind}")]
    NestedSlurmField { key: String, kind: &'static str },
    #[error("`__value__` needs a parent key; it cannot sit at the root of `{0}`")]
    RootMarker(&'static str),
}

impl JobSpec {
    /// Validate a raw entry. Null is an empty spec.
    pub fn from_value(value: &Value) -> Result<Self, SpecError> {
        let entry = match value {
            Value::Null => return Ok(JobSpec::default()),
            Value::Table(t) => t,
            other => return Err(SpecError::NotAMapping(other.kind())),
        };
        if entry.is_selector() {
            return Err(SpecError::UnknownSection(MARKER_KEY.to_string()));
        }
        if let Some(unknown) = entry.keys().find(|k| *k != SLURM_SECTION && *k != SCRIPT_SECTION) {
            return Err(SpecError::UnknownSection(unknown.clone()));
        }

        let slurm = section(entry, SLURM_SECTION)?;
        if let Some((key, value)) = slurm.iter().find(|(_, v)| !v.is_scalar()) {
            return Err(SpecError::NestedSlurmField { key: key.clone(), kind: value.kind() });
        }
        let script = section(entry, SCRIPT_SECTION)?;

        Ok(JobSpec { slurm, script })
    }
}

fn section(entry: &Table, name: &'static str) -> Result<Table, SpecError> {
    let table = match entry.get(name) {
        None | Some(Value::Null) => return Ok(Table::new()),
        Some(Value::Table(t)) => t.clone(),
        Some(other) => {
            return Err(SpecError::SectionNotAMapping { section: name, kind: other.kind() })
        }
    };
    if table.is_selector() {
        return Err(SpecError::RootMarker(name));
    }
    Ok(table)
}

#[cfg(test)]
#[path = "spec_tests.rs"]
mod tests;
