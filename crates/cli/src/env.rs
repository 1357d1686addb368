// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment variables read by the binary.

use ml_adapters::{vcs, SBATCH};
use std::path::{Path, PathBuf};

/// Repository root override
pub const ROOT: &str = "MLAUNCH_ROOT";
/// Log filter, tracing-subscriber `EnvFilter` syntax
pub const LOG: &str = "MLAUNCH_LOG";
/// Submitter program
pub const SBATCH_PROGRAM: &str = "MLAUNCH_SBATCH";

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// `$MLAUNCH_ROOT`, else the git top-level of `cwd`, else `cwd`.
pub fn root(cwd: &Path) -> PathBuf {
    if let Some(root) = non_empty(ROOT) {
        return cwd.join(root);
    }
    vcs::toplevel(cwd).unwrap_or_else(|| cwd.to_path_buf())
}

pub fn log_filter() -> Option<String> {
    non_empty(LOG)
}

pub fn sbatch_program() -> String {
    non_empty(SBATCH_PROGRAM).unwrap_or_else(|| SBATCH.to_string())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
