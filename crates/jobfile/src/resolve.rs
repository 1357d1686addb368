// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layer resolution: shared → per-job → command line.
//!
//! The first two layers are mappings and are deep-merged. The command line
//! contributes in two ways that never go through a mapping merge:
//! recognized launcher flags overwrite single slurm fields, and every other
//! argument is appended verbatim as an override token. Trailing tokens are
//! not deduplicated against flattened ones; the launched program parses them
//! last-wins.

use crate::parser::JobFile;
use crate::spec::{JobSpec, SpecError};
use ml_core::{flatten, join_tokens, merge, OverrideToken, Table, Value};
use thiserror::Error;

/// Launcher fields a command-line flag may set on every job's slurm spec.
pub const SLURM_FIELDS: &[&str] = &[
    "job_name",
    "outdir",
    "cpus_per_task",
    "mem",
    "gres",
    "partition",
    "time",
    "modules",
    "conda_env",
    "venv",
    "code_dir",
    "git_checkout",
    "command",
    "script_path",
];

/// The command-line layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    fields: Table,
    tokens: Vec<OverrideToken>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a named launcher field. Names outside [`SLURM_FIELDS`] are ignored
    /// at resolution time.
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name, value);
        self
    }

    /// Append a trailing override token, verbatim.
    pub fn token(mut self, text: impl Into<String>) -> Self {
        self.tokens.push(OverrideToken::literal(text));
        self
    }

    pub fn fields(&self) -> &Table {
        &self.fields
    }

    pub fn tokens(&self) -> &[OverrideToken] {
        &self.tokens
    }
}

/// One job with all three layers applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedJob {
    pub index: usize,
    /// Merged slurm fields, command-line fields applied.
    pub slurm: Table,
    /// Merged script section, before flattening.
    pub script: Table,
    /// Flattened script tokens followed by the command-line tokens.
    pub tokens: Vec<OverrideToken>,
}

impl ResolvedJob {
    /// Tokens joined into the argument string of the launched program.
    pub fn script_args(&self) -> String {
        join_tokens(&self.tokens)
    }

    /// Slurm field, falling back to the launch defaults.
    pub fn field<'a>(&'a self, name: &str, defaults: &'a Table) -> Option<&'a Value> {
        self.slurm.get(name).or_else(|| defaults.get(name))
    }
}

/// Errors from resolving one job
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("job index {index} is out of range ({len} job(s) in file)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("job {index}: {source}")]
    Spec {
        index: usize,
        #[source]
        source: SpecError,
    },
}

impl ResolveError {
    /// Out-of-range indices abort the whole batch; shape errors only fail
    /// their own job.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, ResolveError::IndexOutOfRange { .. })
    }
}

/// Resolve job `index` of `job_file` against the command-line layer.
pub fn resolve(
    job_file: &JobFile,
    index: usize,
    cli: &CliOverrides,
) -> Result<ResolvedJob, ResolveError> {
    let raw = job_file
        .job(index)
        .ok_or(ResolveError::IndexOutOfRange { index, len: job_file.len() })?;
    let job = JobSpec::from_value(raw).map_err(|source| ResolveError::Spec { index, source })?;
    let shared = job_file.shared();

    let mut slurm = merge(&shared.slurm, &job.slurm);
    for (name, value) in cli.fields().iter() {
        if SLURM_FIELDS.contains(&name.as_str()) {
            if let Some(previous) = slurm.insert(name.clone(), value.clone()) {
                tracing::debug!(
                    index,
                    field = %name,
                    ?previous,
                    "command line overrides slurm field"
                );
            }
        } else {
            tracing::debug!(field = %name, "ignoring non-slurm command-line field");
        }
    }

    let script = merge(&shared.script, &job.script);
    let mut tokens = flatten(&script);
    tokens.extend(cli.tokens().iter().cloned());

    Ok(ResolvedJob { index, slurm, script, tokens })
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
