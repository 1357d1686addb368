// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launch report shown on stdout.

use crate::color;
use ml_engine::{BatchEvent, BatchReport, JobRecord, JobRef, PathResolver, Reporter, RepoWarning};
use ml_jobfile::Defaults;
use std::path::Path;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

const HELP_BODY: &str = include_str!("help.md");

/// Job file shown in the markdown help when the repository has none.
const EXAMPLE_JOBS: &str = "\
shared:
  slurm:
    partition: long
    cpus_per_task: 4
  script:
    optimizer:
      lr: 0.001
jobs:
  - {}
  - slurm:
      job_name: big-lr
    script:
      optimizer:
        lr: 0.01
  - script:
      model:
        __value__: mlp
        hidden: 64";

/// A rendered script between frame lines, indented.
pub fn sbatch_frame(script: &str) -> String {
    let bar = "#".repeat(40);
    let mut out = color::header(&format!("     {bar} <sbatch> {bar}"));
    out.push('\n');
    for line in script.lines() {
        out.push_str("     ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&color::header(&format!("     {bar} </sbatch> {}", &bar[1..])));
    out.push('\n');
    out
}

pub fn warnings_block(warnings: &[RepoWarning]) -> String {
    let mut out = color::warn("Repository warnings:");
    out.push('\n');
    for warning in warnings {
        out.push_str(&format!("  • {warning}\n"));
    }
    out
}

/// What happened to one job.
pub fn job_line(record: &JobRecord, paths: &PathResolver) -> String {
    let script = color::literal(&paths.display(&record.script_path));
    let output = color::literal(&paths.display(&record.output_file));
    match &record.job_ref {
        JobRef::Submitted(id) => format!(
            "Submitted batch job {}\n  script: {script}\n  output: {output}\n",
            color::header(id)
        ),
        JobRef::DryRun => format!("DRY RUN: job {} would be written to {script}\n", record.index),
    }
}

/// Closing lines of a batch that ran to completion.
pub fn recap(report: &BatchReport, paths: &PathResolver) -> String {
    let mut out = String::new();
    if report.dry_run {
        out.push_str(&format!(
            "DRY RUN: {} of {} job(s) rendered, nothing submitted\n",
            report.jobs.len(),
            report.total
        ));
        if let Some(path) = &report.summary_path {
            let path = paths.display(path);
            out.push_str(&format!("DRY RUN: summary would be written to {path}\n"));
        }
    } else {
        let ids = report.job_ids();
        if ids.is_empty() {
            out.push_str("No job submitted!\n");
        } else {
            out.push_str(&format!("All jobs submitted: {}\n", ids.join(" ")));
        }
        if let (Some(path), true) = (&report.summary_path, report.summary_written) {
            out.push_str(&format!("Summary: {}\n", color::literal(&paths.display(path))));
        }
    }
    for failure in &report.failures {
        out.push_str(&format!(
            "{} job {} skipped: {}\n",
            color::warn("✗"),
            failure.index,
            failure.error
        ));
    }
    out
}

/// The effective launch settings, as YAML.
pub fn configuration(settings: &Defaults) -> anyhow::Result<String> {
    Ok(serde_yaml::to_string(settings)?)
}

/// The example job file used by the markdown help: the repository's
/// `config/jobs/example-jobs.yaml` from its `shared:` line on, or a built-in one.
pub fn example_jobs(root: &Path) -> String {
    let path = ml_jobfile::find::jobs_dir(root).join("example-jobs.yaml");
    let Ok(text) = std::fs::read_to_string(&path) else {
        return EXAMPLE_JOBS.to_string();
    };
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.iter().position(|l| l.starts_with("shared:")).unwrap_or(0);
    lines[start..].join("\n")
}

/// The full help as one markdown document.
pub fn help_markdown(usage: &str, defaults_yaml: &str, example: &str) -> String {
    let mut out = String::from("# 🤝 mlaunch help\n\n");
    out.push_str("## 💻 Command-line help\n\n");
    out.push_str("In the following, `$root` refers to the root of the current repository.\n\n");
    out.push_str(&format!("```sh\n{}\n```\n\n", usage.trim_end()));
    out.push_str("## 🎛️ Default values\n\n");
    out.push_str(&format!("```yaml\n{}\n```\n", defaults_yaml.trim_end()));
    out.push_str(&HELP_BODY.replace("{yaml_example}", example.trim_end()));
    out
}

/// Prints batch progress as it happens.
pub struct TerminalReporter<'a> {
    paths: &'a PathResolver,
    verbose: bool,
    dry_run: bool,
}

impl<'a> TerminalReporter<'a> {
    pub fn new(paths: &'a PathResolver, verbose: bool, dry_run: bool) -> Self {
        Self { paths, verbose, dry_run }
    }
}

impl Reporter for TerminalReporter<'_> {
    fn report(&mut self, event: BatchEvent<'_>) {
        match event {
            BatchEvent::Loaded { jobs_file, template, total } => {
                if self.verbose {
                    if let Some(location) = jobs_file {
                        println!("Jobs file: {}", self.paths.display(&location.path));
                    }
                    println!("Template: {template}");
                    println!("Jobs: {total}");
                }
                if self.dry_run {
                    println!("{}", color::muted("DRY RUN: nothing will be written or submitted"));
                }
            }
            BatchEvent::RepoWarnings(warnings) => eprint!("{}", warnings_block(warnings)),
            BatchEvent::Launched(record) => {
                print!("{}", job_line(record, self.paths));
                if self.dry_run || self.verbose {
                    print!("{}", sbatch_frame(&record.script));
                }
            }
            // The engine logs the cause; the recap lists every skipped job.
            BatchEvent::JobFailed { .. } => {}
        }
    }
}
