// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launch defaults: the lowest-precedence layer under every job.

use crate::parser::{self, Format, ParseError};
use crate::resolve::SLURM_FIELDS;
use ml_core::{Table, Value};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the built-in submission template.
pub const DEFAULT_TEMPLATE: &str = "default.sbatch";

/// Process-wide launch settings.
///
/// Read once from `config/launch.{toml,yaml,yml,json}` under the repository
/// root; any field the file leaves out keeps its built-in value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    pub job_name: String,
    pub outdir: String,
    pub cpus_per_task: u32,
    pub mem: String,
    pub gres: String,
    pub partition: String,
    pub time: Option<String>,
    pub modules: Option<String>,
    pub conda_env: Option<String>,
    pub venv: Option<String>,
    pub template: String,
    pub code_dir: String,
    pub git_checkout: Option<String>,
    pub jobs: Option<String>,
    pub dry_run: bool,
    pub verbose: bool,
    pub force: bool,
    pub command: String,
    pub script_path: String,
    pub sbatch_files_root: String,
    pub allow_unclean_repo: bool,
    pub allow_no_checkout: bool,
    pub clone_as_https: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            job_name: "mlaunch".to_string(),
            outdir: "$root/logs/slurm".to_string(),
            cpus_per_task: 2,
            mem: "32G".to_string(),
            gres: "gpu:1".to_string(),
            partition: "long".to_string(),
            time: None,
            modules: None,
            conda_env: None,
            venv: None,
            template: DEFAULT_TEMPLATE.to_string(),
            code_dir: "$root".to_string(),
            git_checkout: None,
            jobs: None,
            dry_run: false,
            verbose: false,
            force: false,
            command: "python".to_string(),
            script_path: "main.py".to_string(),
            sbatch_files_root: "$root/external/launched_sbatch_scripts".to_string(),
            allow_unclean_repo: false,
            allow_no_checkout: true,
            clone_as_https: false,
        }
    }
}

impl Defaults {
    /// Candidate file paths, in lookup order.
    pub fn candidates(root: &Path) -> Vec<PathBuf> {
        let dir = root.join("config");
        Format::EXTENSIONS.iter().map(|ext| dir.join(format!("launch.{ext}"))).collect()
    }

    /// Load the first defaults file found under `root`, or the built-in values.
    pub fn discover(root: &Path) -> Result<Self, ParseError> {
        match Self::candidates(root).into_iter().find(|p| p.is_file()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading launch defaults");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ParseError> {
        parser::from_path(path)
    }

    /// The template-visible subset, keyed like a slurm section.
    pub fn fields(&self) -> Table {
        let mut table = Table::new();
        for name in SLURM_FIELDS {
            table.insert(*name, self.field(name));
        }
        table
    }

    fn field(&self, name: &str) -> Value {
        match name {
            "job_name" => self.job_name.as_str().into(),
            "outdir" => self.outdir.as_str().into(),
            "cpus_per_task" => self.cpus_per_task.into(),
            "mem" => self.mem.as_str().into(),
            "gres" => self.gres.as_str().into(),
            "partition" => self.partition.as_str().into(),
            "time" => self.time.clone().into(),
            "modules" => self.modules.clone().into(),
            "conda_env" => self.conda_env.clone().into(),
            "venv" => self.venv.clone().into(),
            "code_dir" => self.code_dir.as_str().into(),
            "git_checkout" => self.git_checkout.clone().into(),
            "command" => self.command.as_str().into(),
            "script_path" => self.script_path.as_str().into(),
            _ => Value::Null,
        }
    }
}

#[cfg(test)]
#[path = "defaults_tests.rs"]
mod tests;
