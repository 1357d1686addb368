// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job template fields computed from the resolved layers.

use crate::error::JobError;
use crate::paths::PathResolver;
use ml_adapters::vcs::{repo_name, ssh_to_https};
use ml_adapters::RepoAdapter;
use ml_core::{encode, Table, Value};
use ml_jobfile::{DerivedFields, ResolvedJob};

/// Marker that moves the code into a fresh clone on the compute node.
pub const SLURM_TMPDIR: &str = "SLURM_TMPDIR";

/// What derivation needs beyond the job itself.
pub struct DeriveContext<'a, R> {
    pub paths: &'a PathResolver,
    pub repo: &'a R,
    /// Template-visible launch defaults
    pub defaults: &'a Table,
    pub clone_as_https: bool,
}

/// Compute `outdir`, `venv`, `code_dir`, `git_checkout` and `script_args`.
pub fn derive_fields<R: RepoAdapter>(
    job: &ResolvedJob,
    ctx: &DeriveContext<'_, R>,
) -> Result<DerivedFields, JobError> {
    let text = |name: &str| field_text(job.field(name, ctx.defaults));

    let mut derived = DerivedFields::new();
    derived.insert("outdir", resolve_non_empty(ctx.paths, &text("outdir")));
    derived.insert("venv", resolve_non_empty(ctx.paths, &text("venv")));

    let checkout = text("git_checkout");
    derived.insert("git_checkout", checkout.clone());

    let code_dir = text("code_dir");
    let code_dir = if code_dir.contains(SLURM_TMPDIR) {
        clone_snippet(ctx, &checkout)?
    } else {
        resolve_non_empty(ctx.paths, &code_dir)
    };
    derived.insert("code_dir", code_dir);

    derived.insert("script_args", job.script_args());
    Ok(derived)
}

/// Scalar field as text; null and missing are empty.
pub fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(value) => encode(value),
    }
}

fn resolve_non_empty(paths: &PathResolver, raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    paths.resolve(raw).display().to_string()
}

/// Lines substituted for `{code_dir}` after a `cd `: go to the node-local
/// directory, clone, enter the clone and check out.
fn clone_snippet<R: RepoAdapter>(
    ctx: &DeriveContext<'_, R>,
    checkout: &str,
) -> Result<String, JobError> {
    let origin = ctx.repo.origin_url()?.ok_or(JobError::NoOrigin)?;
    let url = if ctx.clone_as_https { ssh_to_https(&origin)? } else { origin.clone() };
    let name = repo_name(&origin);

    let checkout = if checkout.is_empty() {
        ctx.repo.current_branch()?.unwrap_or_default()
    } else {
        checkout.to_string()
    };
    let checkout_line =
        if checkout.is_empty() { String::new() } else { format!("git checkout {checkout}") };

    tracing::debug!(%url, %checkout, "cloning into $SLURM_TMPDIR");
    Ok(format!(
        "$SLURM_TMPDIR\ngit clone {url} tmp-{name}\ncd tmp-{name}\n{checkout_line}\n\
         echo \"Current commit: $(git rev-parse HEAD)\"\n"
    ))
}

#[cfg(test)]
#[path = "derive_tests.rs"]
mod tests;
