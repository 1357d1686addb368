// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ml-adapters: scheduler, terminal and repository boundaries

pub mod prompt;
pub mod submit;
pub mod vcs;

pub use prompt::{ConfirmAdapter, TerminalConfirm};
pub use submit::{SbatchAdapter, SubmitAdapter, SubmitError, SBATCH};
pub use vcs::{GitRepo, RemoteStatus, RepoAdapter, RepoError};

#[cfg(any(test, feature = "test-support"))]
pub use prompt::FakeConfirm;
#[cfg(any(test, feature = "test-support"))]
pub use submit::{FakeSubmitAdapter, SubmitCall};
#[cfg(any(test, feature = "test-support"))]
pub use vcs::{FakeRepo, FakeRepoState};
