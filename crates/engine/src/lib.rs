// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ml-engine: batch orchestration for mlaunch

pub mod artifact;
pub mod batch;
pub mod checks;
pub mod derive;
mod error;
pub mod paths;
pub mod summary;

pub use batch::{
    run_batch, Batch, BatchConfig, BatchDeps, BatchEvent, BatchReport, BatchState, JobFailure,
    JobRecord, JobRef, Reporter,
};
pub use checks::{CheckPolicy, RepoWarning};
pub use error::{BatchError, JobError};
pub use paths::PathResolver;
pub use summary::Summary;
