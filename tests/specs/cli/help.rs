// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and version output.

use crate::prelude::*;

#[test]
fn help_lists_underscore_options() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("--job_name")
        .stdout_has("--sbatch_files_root")
        .stdout_has("--help-md");
}

#[test]
fn version_shows_crate_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn help_md_renders_markdown_with_defaults() {
    let project = Project::empty();
    project
        .mlaunch()
        .args(&["--help-md"])
        .passes()
        .stdout_has("# 🤝 mlaunch help")
        .stdout_has("## 🎛️ Default values")
        .stdout_has("job_name: mlaunch")
        .stdout_has("__value__: mlp");
}

#[test]
fn help_md_shows_repository_defaults_and_example() {
    let project = Project::empty();
    project.file("config/launch.yaml", "partition: main\n");
    project.file(
        "config/jobs/example-jobs.yaml",
        "# comment\nshared:\n  slurm:\n    mem: 1G\njobs:\n  - {}\n",
    );
    project
        .mlaunch()
        .args(&["--help-md"])
        .passes()
        .stdout_has("partition: main")
        .stdout_has("shared:\n  slurm:\n    mem: 1G")
        .stdout_lacks("# comment");
}

#[test]
fn invalid_defaults_file_is_fatal() {
    let project = Project::empty();
    project.file("config/launch.yaml", "no_such_setting: 1\n");
    project
        .mlaunch()
        .args(&["--dry_run"])
        .exits_with(1)
        .stderr_has("error: launch defaults");
}

#[test]
fn bad_option_value_is_fatal() {
    cli()
        .args(&["--cpus_per_task", "many"])
        .exits_with(1)
        .stderr_has("invalid value 'many'");
}
