// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository warnings shown before the user confirms a batch.

use ml_adapters::{RemoteStatus, RepoAdapter, RepoError};
use std::fmt;

/// Something about the working tree the launched jobs will not see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoWarning {
    NoCheckout { branch: String },
    Dirty,
    Behind { remote: String, checkout: String, commits: usize },
    Ahead { remote: String, checkout: String, commits: usize },
    MissingOnRemote { remote: String, checkout: String },
}

impl fmt::Display for RepoWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoWarning::NoCheckout { branch } => {
                write!(f, "`--git_checkout` not provided. Using current branch: {branch}")
            }
            RepoWarning::Dirty => f.write_str(
                "Your repo contains uncommitted changes. \
                 They will *not* be available when cloning happens within the job.",
            ),
            RepoWarning::Behind { remote, checkout, commits } => {
                write!(f, "You are {commits} commits behind {remote}/{checkout}")
            }
            RepoWarning::Ahead { remote, checkout, commits } => {
                write!(f, "You are {commits} commits ahead of {remote}/{checkout}")
            }
            RepoWarning::MissingOnRemote { remote, checkout } => {
                write!(f, "checkout {checkout} not found on remote {remote}")
            }
        }
    }
}

/// Policy knobs for [`repo_warnings`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckPolicy {
    pub allow_no_checkout: bool,
    pub allow_unclean_repo: bool,
}

/// Collect warnings for launching `checkout` from `repo`.
///
/// Outside a repository there is nothing to warn about. Failing git queries
/// are logged and skipped.
pub fn repo_warnings<R: RepoAdapter>(
    repo: &R,
    checkout: Option<&str>,
    policy: CheckPolicy,
) -> Vec<RepoWarning> {
    if !repo.is_repo() {
        tracing::debug!("not a git repository, skipping checks");
        return Vec::new();
    }
    let mut warnings = Vec::new();

    let checkout = match checkout.filter(|c| !c.is_empty()) {
        Some(checkout) => Some(checkout.to_string()),
        None => {
            let branch = logged(repo.current_branch()).flatten();
            if let (Some(branch), false) = (&branch, policy.allow_no_checkout) {
                warnings.push(RepoWarning::NoCheckout { branch: branch.clone() });
            }
            branch
        }
    };

    if !policy.allow_unclean_repo && logged(repo.is_dirty()).unwrap_or(false) {
        warnings.push(RepoWarning::Dirty);
    }

    let Some(checkout) = checkout else {
        return warnings;
    };
    for remote in logged(repo.remotes()).unwrap_or_default() {
        match logged(repo.remote_status(&remote, &checkout)) {
            Some(RemoteStatus::Missing) => {
                warnings.push(RepoWarning::MissingOnRemote { remote, checkout: checkout.clone() });
            }
            Some(RemoteStatus::Tracking { behind, ahead }) => {
                if behind > 0 {
                    warnings.push(RepoWarning::Behind {
                        remote: remote.clone(),
                        checkout: checkout.clone(),
                        commits: behind,
                    });
                }
                if ahead > 0 {
                    warnings.push(RepoWarning::Ahead {
                        remote,
                        checkout: checkout.clone(),
                        commits: ahead,
                    });
                }
            }
            None => {}
        }
    }
    warnings
}

fn logged<T>(result: Result<T, RepoError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "repository check failed");
            None
        }
    }
}

#[cfg(test)]
#[path = "checks_tests.rs"]
mod tests;
