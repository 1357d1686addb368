// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires the real collaborators into a batch run.

use crate::args::Args;
use crate::env;
use crate::exit_error::ExitError;
use crate::output::{self, TerminalReporter};
use anyhow::Context;
use clap::CommandFactory;
use ml_adapters::{GitRepo, SbatchAdapter, TerminalConfirm};
use ml_core::SystemClock;
use ml_engine::{run_batch, BatchConfig, BatchDeps, PathResolver};
use ml_jobfile::Defaults;
use std::path::{Path, PathBuf};

fn repository_root() -> anyhow::Result<PathBuf> {
    let cwd = std::env::current_dir().context("cannot read the current directory")?;
    Ok(env::root(&cwd))
}

fn load_settings(root: &Path) -> Result<Defaults, ExitError> {
    Defaults::discover(root).map_err(|e| ExitError::fatal(format!("launch defaults: {e}")))
}

/// `--help-md`: print the markdown help.
pub fn help_md() -> anyhow::Result<()> {
    let root = repository_root()?;
    let settings = load_settings(&root)?;
    let usage = Args::command().render_long_help().to_string();
    let defaults = output::configuration(&settings)?;
    print!("{}", output::help_markdown(&usage, &defaults, &output::example_jobs(&root)));
    Ok(())
}

/// Launch the batch described by `args`.
pub fn run(args: &Args, command_line: String) -> anyhow::Result<()> {
    let root = repository_root()?;
    tracing::debug!(root = %root.display(), "repository root");

    let mut settings = load_settings(&root)?;
    args.apply(&mut settings);
    if settings.verbose {
        println!("Launch configuration:\n{}", output::configuration(&settings)?);
    }

    let paths = PathResolver::new(&root);
    let mut reporter = TerminalReporter::new(&paths, settings.verbose, settings.dry_run);
    let config = BatchConfig { root: root.clone(), settings, cli: args.overrides(), command_line };
    let deps = BatchDeps {
        submitter: SbatchAdapter::new(env::sbatch_program()),
        confirm: TerminalConfirm,
        repo: GitRepo::new(root),
        clock: SystemClock,
    };

    let report = run_batch(&config, &deps, &mut reporter)
        .map_err(|e| ExitError::fatal(e.to_string()))?;
    if report.aborted() {
        return Err(ExitError::aborted().into());
    }
    print!("{}", output::recap(&report, &paths));
    Ok(())
}
