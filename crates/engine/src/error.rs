// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use ml_adapters::{RepoError, SubmitError};
use ml_jobfile::{FindError, ParseError, RenderError, ResolveError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop the whole batch before anything is submitted
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("{0}")]
    Find(#[from] FindError),
    #[error("{}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("cannot read template {template}: {source}")]
    Template {
        template: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Resolve(ResolveError),
    #[error("confirmation prompt failed: {0}")]
    Confirm(#[source] std::io::Error),
}

/// Errors that fail a single job; the rest of the batch carries on
#[derive(Debug, Error)]
pub enum JobError {
    #[error("{0}")]
    Resolve(#[from] ResolveError),
    #[error("template: {0}")]
    Render(#[from] RenderError),
    #[error("code_dir mentions SLURM_TMPDIR but the repository has no `origin` remote")]
    NoOrigin,
    #[error("repository: {0}")]
    Repo(#[from] RepoError),
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("submission failed: {0}")]
    Submit(#[from] SubmitError),
}

impl JobError {
    pub(crate) fn write(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> JobError {
        let path = path.into();
        move |source| JobError::Write { path, source }
    }
}
