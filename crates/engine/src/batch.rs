// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch orchestration: load, confirm, then render and submit each job.

use crate::artifact::{self, ArtifactNamer};
use crate::checks::{repo_warnings, CheckPolicy, RepoWarning};
use crate::derive::{derive_fields, field_text, DeriveContext};
use crate::error::{BatchError, JobError};
use crate::paths::PathResolver;
use crate::summary::Summary;
use ml_adapters::{ConfirmAdapter, RepoAdapter, SubmitAdapter};
use ml_core::{Clock, OverrideToken, Table};
use ml_jobfile::{
    find_jobs_file, find_template, parse_job_file, resolve, CliOverrides, Defaults, Format,
    JobFile, JobsLocation, ParseError, ResolveError, ResolvedJob, OTHER_SUBDIR,
};
use std::fmt;
use std::path::PathBuf;

/// Collaborators of a batch run
pub struct BatchDeps<S, C, R, K> {
    pub submitter: S,
    pub confirm: C,
    pub repo: R,
    pub clock: K,
}

/// What to launch.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Repository root; `$root` in configured paths
    pub root: PathBuf,
    /// Launch settings with command-line options already applied
    pub settings: Defaults,
    /// Command-line slurm fields and trailing tokens
    pub cli: CliOverrides,
    /// Command line recorded in the summary
    pub command_line: String,
}

/// Batch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Loaded,
    Resolved(usize),
    Rendered(usize),
    Submitted(usize),
    Summarized,
    Done,
    Aborted,
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchState::Loaded => f.write_str("loaded"),
            BatchState::Resolved(i) => write!(f, "resolved({i})"),
            BatchState::Rendered(i) => write!(f, "rendered({i})"),
            BatchState::Submitted(i) => write!(f, "submitted({i})"),
            BatchState::Summarized => f.write_str("summarized"),
            BatchState::Done => f.write_str("done"),
            BatchState::Aborted => f.write_str("aborted"),
        }
    }
}

/// Identifier slot of a launched job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRef {
    Submitted(String),
    DryRun,
}

impl fmt::Display for JobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobRef::Submitted(id) => f.write_str(id),
            JobRef::DryRun => f.write_str("dry-run"),
        }
    }
}

/// A job that reached the scheduler (or would have, in a dry run).
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub index: usize,
    pub job_ref: JobRef,
    /// Arguments appended to the script invocation
    pub tokens: Vec<OverrideToken>,
    pub script_path: PathBuf,
    pub output_file: PathBuf,
    /// Script text as written, footer included
    pub script: String,
}

/// A job that was skipped.
#[derive(Debug)]
pub struct JobFailure {
    pub index: usize,
    pub error: JobError,
}

/// Progress notifications for the user-facing layer.
#[derive(Debug)]
pub enum BatchEvent<'a> {
    Loaded { jobs_file: Option<&'a JobsLocation>, template: &'a str, total: usize },
    RepoWarnings(&'a [RepoWarning]),
    Launched(&'a JobRecord),
    JobFailed { index: usize, error: &'a JobError },
}

/// Receives [`BatchEvent`]s as they happen
pub trait Reporter {
    fn report(&mut self, event: BatchEvent<'_>);
}

impl<F: FnMut(BatchEvent<'_>)> Reporter for F {
    fn report(&mut self, event: BatchEvent<'_>) {
        self(event)
    }
}

/// Outcome of a batch that was not stopped by a configuration error.
#[derive(Debug)]
pub struct BatchReport {
    pub state: BatchState,
    pub total: usize,
    pub dry_run: bool,
    pub jobs_file: Option<JobsLocation>,
    pub warnings: Vec<RepoWarning>,
    pub jobs: Vec<JobRecord>,
    pub failures: Vec<JobFailure>,
    pub summary: Option<Summary>,
    pub summary_path: Option<PathBuf>,
    /// False in dry runs and when writing failed
    pub summary_written: bool,
}

impl BatchReport {
    pub fn aborted(&self) -> bool {
        self.state == BatchState::Aborted
    }

    pub fn job_ids(&self) -> Vec<String> {
        self.jobs.iter().map(|j| j.job_ref.to_string()).collect()
    }
}

/// Runs one batch with injected collaborators.
pub struct Batch<'a, S, C, R, K> {
    config: &'a BatchConfig,
    deps: &'a BatchDeps<S, C, R, K>,
    paths: PathResolver,
    state: BatchState,
}

impl<'a, S, C, R, K> Batch<'a, S, C, R, K>
where
    S: SubmitAdapter,
    C: ConfirmAdapter,
    R: RepoAdapter,
    K: Clock,
{
    pub fn new(config: &'a BatchConfig, deps: &'a BatchDeps<S, C, R, K>) -> Self {
        Self { config, deps, paths: PathResolver::new(&config.root), state: BatchState::Loaded }
    }

    /// Use a custom path resolver (e.g. with a fixed home directory).
    pub fn with_paths(mut self, paths: PathResolver) -> Self {
        self.paths = paths;
        self
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    fn transition(&mut self, next: BatchState) {
        tracing::debug!(from = %self.state, to = %next, "batch state");
        self.state = next;
    }

    pub fn run(mut self, reporter: &mut impl Reporter) -> Result<BatchReport, BatchError> {
        let config = self.config;
        let settings = &config.settings;
        let root = &config.root;

        let location = settings.jobs.as_deref().map(|r| find_jobs_file(root, r)).transpose()?;
        let (job_file, source) = match &location {
            Some(location) => load(location)?,
            None => (JobFile::single(), String::new()),
        };

        let template_ref = self.paths.resolve(&settings.template);
        let template_source = find_template(root, &template_ref)?;
        let template = template_source.read().map_err(|source| BatchError::Template {
            template: template_source.to_string(),
            source,
        })?;
        let template_name = template_source.to_string();

        let total = job_file.len();
        let mut jobs: Vec<Result<ResolvedJob, ResolveError>> = Vec::with_capacity(total);
        for index in 0..total {
            match resolve(&job_file, index, &config.cli) {
                Err(e) if e.is_batch_fatal() => return Err(BatchError::Resolve(e)),
                other => jobs.push(other),
            }
        }
        reporter.report(BatchEvent::Loaded {
            jobs_file: location.as_ref(),
            template: &template_name,
            total,
        });

        let dry_run = settings.dry_run;
        let mut report = BatchReport {
            state: BatchState::Loaded,
            total,
            dry_run,
            jobs_file: location.clone(),
            warnings: Vec::new(),
            jobs: Vec::new(),
            failures: Vec::new(),
            summary: None,
            summary_path: None,
            summary_written: false,
        };

        if !settings.force && !dry_run && !self.confirm_gates(total, reporter, &mut report)? {
            self.transition(BatchState::Aborted);
            report.state = BatchState::Aborted;
            tracing::info!("batch aborted by user");
            return Ok(report);
        }

        let subdir = location
            .as_ref()
            .map_or_else(|| PathBuf::from(OTHER_SUBDIR), |l| l.artifact_subdir.clone());
        let namer = ArtifactNamer::new(
            self.paths.resolve(&settings.sbatch_files_root).join(subdir),
            location.as_ref().map(JobsLocation::stem),
            self.deps.clock.stamp(),
        );
        let defaults = settings.fields();

        for (index, job) in jobs.into_iter().enumerate() {
            match self.launch(index, job, &template, &defaults, &namer) {
                Ok(record) => {
                    reporter.report(BatchEvent::Launched(&record));
                    report.jobs.push(record);
                }
                Err(error) => {
                    tracing::warn!(index, error = %error, "job skipped");
                    reporter.report(BatchEvent::JobFailed { index, error: &error });
                    report.failures.push(JobFailure { index, error });
                }
            }
        }

        if location.is_some() {
            let summary = Summary {
                source,
                command: config.command_line.clone(),
                job_ids: report.job_ids(),
                output_files: report.jobs.iter().map(|j| j.output_file.clone()).collect(),
            };
            let path = namer.summary();
            if let (Some(path), false) = (&path, dry_run) {
                report.summary_written = write_summary(path, &summary);
            }
            report.summary = Some(summary);
            report.summary_path = path;
            self.transition(BatchState::Summarized);
        }

        self.transition(BatchState::Done);
        report.state = BatchState::Done;
        tracing::info!(
            submitted = report.jobs.len(),
            failed = report.failures.len(),
            total,
            dry_run,
            "batch finished"
        );
        Ok(report)
    }

    /// Repository warnings gate, then the submission gate. False when declined.
    fn confirm_gates(
        &self,
        total: usize,
        reporter: &mut impl Reporter,
        report: &mut BatchReport,
    ) -> Result<bool, BatchError> {
        let config = self.config;
        let settings = &config.settings;
        let checkout = config
            .cli
            .fields()
            .get("git_checkout")
            .map(|v| field_text(Some(v)))
            .or_else(|| settings.git_checkout.clone());
        let policy = CheckPolicy {
            allow_no_checkout: settings.allow_no_checkout,
            allow_unclean_repo: settings.allow_unclean_repo,
        };
        report.warnings = repo_warnings(&self.deps.repo, checkout.as_deref(), policy);

        if !report.warnings.is_empty() {
            reporter.report(BatchEvent::RepoWarnings(&report.warnings));
            if !self.deps.confirm.confirm("Continue anyway?").map_err(BatchError::Confirm)? {
                return Ok(false);
            }
        }
        let question = format!("Submit {total} job{}?", if total == 1 { "" } else { "s" });
        self.deps.confirm.confirm(&question).map_err(BatchError::Confirm)
    }

    fn launch(
        &mut self,
        index: usize,
        job: Result<ResolvedJob, ResolveError>,
        template: &str,
        defaults: &Table,
        namer: &ArtifactNamer,
    ) -> Result<JobRecord, JobError> {
        let job = job?;
        self.transition(BatchState::Resolved(index));

        let ctx = DeriveContext {
            paths: &self.paths,
            repo: &self.deps.repo,
            defaults,
            clone_as_https: self.config.settings.clone_as_https,
        };
        let derived = derive_fields(&job, &ctx)?;
        let script = ml_jobfile::render(template, &job.slurm, &derived, defaults)?;
        self.transition(BatchState::Rendered(index));

        let job_name = field_text(job.field("job_name", defaults));
        let outdir = derived.get("outdir").unwrap_or_default().to_string();
        let pending = namer.pending(index, &job_name);

        if self.config.settings.dry_run {
            let job_ref = JobRef::DryRun;
            return Ok(JobRecord {
                index,
                output_file: artifact::output_file(&outdir, &job_name, &job_ref.to_string()),
                job_ref,
                tokens: job.tokens,
                script_path: pending,
                script,
            });
        }

        if !outdir.is_empty() {
            std::fs::create_dir_all(&outdir).map_err(JobError::write(&outdir))?;
        }
        artifact::write_script(&pending, &script)?;
        let job_id = self.deps.submitter.submit(&pending)?;
        self.transition(BatchState::Submitted(index));

        let output_file = artifact::output_file(&outdir, &job_name, &job_id);
        let footer = artifact::footer(&job_id, &output_file);
        let submitted = namer.submitted(&job_name, &job_id);
        let script_path = match artifact::finalize(&pending, &submitted, &script, &footer) {
            Ok(()) => submitted,
            Err(e) => {
                tracing::warn!(index, %job_id, error = %e, "submitted script left at pending name");
                pending
            }
        };

        Ok(JobRecord {
            index,
            job_ref: JobRef::Submitted(job_id),
            tokens: job.tokens,
            script_path,
            output_file,
            script: format!("{script}{footer}"),
        })
    }
}

fn load(location: &JobsLocation) -> Result<(JobFile, String), BatchError> {
    let path = &location.path;
    let parse_err = |source| BatchError::Parse { path: path.clone(), source };
    let format = Format::from_path(path)
        .ok_or_else(|| parse_err(ParseError::UnknownFormat(path.clone())))?;
    let source = std::fs::read_to_string(path)
        .map_err(|source| parse_err(ParseError::Io { path: path.clone(), source }))?;
    let job_file = parse_job_file(&source, format).map_err(parse_err)?;
    Ok((job_file, source))
}

fn write_summary(path: &std::path::Path, summary: &Summary) -> bool {
    let written = path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|()| std::fs::write(path, summary.render()));
    match written {
        Ok(()) => {
            tracing::info!(path = %path.display(), "wrote batch summary");
            true
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "cannot write batch summary");
            false
        }
    }
}

/// Run a batch with the given collaborators.
pub fn run_batch<S, C, R, K>(
    config: &BatchConfig,
    deps: &BatchDeps<S, C, R, K>,
    reporter: &mut impl Reporter,
) -> Result<BatchReport, BatchError>
where
    S: SubmitAdapter,
    C: ConfirmAdapter,
    R: RepoAdapter,
    K: Clock,
{
    Batch::new(config, deps).run(reporter)
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
