// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git repository queries used to warn before launching from a stale tree.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Errors from repository operations
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("failed to run git: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("`git {args}` failed: {stderr}")]
    Git { args: String, stderr: String },
    #[error("cannot convert remote url `{0}` to https")]
    UnsupportedUrl(String),
}

/// Position of the local checkout relative to one remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    /// The checkout has no counterpart on the remote
    Missing,
    Tracking { behind: usize, ahead: usize },
}

/// Adapter for the repository the jobs are launched from
pub trait RepoAdapter {
    /// False when the root is not inside a git work tree
    fn is_repo(&self) -> bool;
    /// Current branch, `None` on a detached head
    fn current_branch(&self) -> Result<Option<String>, RepoError>;
    /// Whether tracked files have uncommitted changes
    fn is_dirty(&self) -> Result<bool, RepoError>;
    fn remotes(&self) -> Result<Vec<String>, RepoError>;
    fn remote_status(&self, remote: &str, checkout: &str) -> Result<RemoteStatus, RepoError>;
    /// URL of the `origin` remote, if there is one
    fn origin_url(&self) -> Result<Option<String>, RepoError>;
}

/// Queries a work tree through the `git` command line.
#[derive(Clone, Debug)]
pub struct GitRepo {
    dir: PathBuf,
}

impl GitRepo {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn git(&self, args: &[&str]) -> Result<std::process::Output, RepoError> {
        Command::new("git").args(args).current_dir(&self.dir).output().map_err(RepoError::Spawn)
    }

    /// Run git and return trimmed stdout, failing on a non-zero exit.
    fn read(&self, args: &[&str]) -> Result<String, RepoError> {
        let output = self.git(args)?;
        if !output.status.success() {
            return Err(RepoError::Git {
                args: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn succeeds(&self, args: &[&str]) -> Result<bool, RepoError> {
        Ok(self.git(args)?.status.success())
    }
}

impl RepoAdapter for GitRepo {
    fn is_repo(&self) -> bool {
        self.read(&["rev-parse", "--is-inside-work-tree"]).is_ok_and(|out| out == "true")
    }

    fn current_branch(&self) -> Result<Option<String>, RepoError> {
        let branch = self.read(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        Ok((!branch.is_empty() && branch != "HEAD").then_some(branch))
    }

    fn is_dirty(&self) -> Result<bool, RepoError> {
        let status = self.read(&["status", "--porcelain", "--untracked-files=no"])?;
        Ok(!status.is_empty())
    }

    fn remotes(&self) -> Result<Vec<String>, RepoError> {
        let out = self.read(&["remote"])?;
        Ok(out.lines().map(str::to_string).filter(|r| !r.is_empty()).collect())
    }

    fn remote_status(&self, remote: &str, checkout: &str) -> Result<RemoteStatus, RepoError> {
        let remote_ref = format!("{remote}/{checkout}");
        if !self.succeeds(&["rev-parse", "--verify", "--quiet", &remote_ref])? {
            return Ok(RemoteStatus::Missing);
        }
        let range = format!("{checkout}...{remote_ref}");
        let counts = self.read(&["rev-list", "--left-right", "--count", &range])?;
        let mut parts = counts.split_whitespace().map(|n| n.parse::<usize>().unwrap_or(0));
        let ahead = parts.next().unwrap_or(0);
        let behind = parts.next().unwrap_or(0);
        Ok(RemoteStatus::Tracking { behind, ahead })
    }

    fn origin_url(&self) -> Result<Option<String>, RepoError> {
        let output = self.git(&["remote", "get-url", "origin"])?;
        if !output.status.success() {
            return Ok(None);
        }
        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!url.is_empty()).then_some(url))
    }
}

/// Top-level directory of the work tree containing `dir`.
pub fn toplevel(dir: &Path) -> Option<PathBuf> {
    GitRepo::new(dir).read(&["rev-parse", "--show-toplevel"]).ok().map(PathBuf::from)
}

/// `git@host:org/repo.git` → `https://host/org/repo.git`; https urls pass through.
pub fn ssh_to_https(url: &str) -> Result<String, RepoError> {
    if url.starts_with("https://") {
        return Ok(url.to_string());
    }
    let rest = url.strip_prefix("ssh://").unwrap_or(url);
    let Some((user_host, path)) = rest.split_once(':').or_else(|| rest.split_once('/')) else {
        return Err(RepoError::UnsupportedUrl(url.to_string()));
    };
    let host = user_host.rsplit_once('@').map_or(user_host, |(_, host)| host);
    if !user_host.contains('@') || host.is_empty() || path.is_empty() {
        return Err(RepoError::UnsupportedUrl(url.to_string()));
    }
    Ok(format!("https://{host}/{}", path.trim_start_matches('/')))
}

/// Repository name from a remote url: last path segment without `.git`.
pub fn repo_name(url: &str) -> &str {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed);
    last.strip_suffix(".git").unwrap_or(last)
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{RemoteStatus, RepoAdapter, RepoError};
    use parking_lot::Mutex;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    /// Repository state served by [`FakeRepo`]
    #[derive(Debug, Clone)]
    pub struct FakeRepoState {
        pub is_repo: bool,
        pub branch: Option<String>,
        pub dirty: bool,
        pub origin: Option<String>,
        /// Keyed by remote name; `Missing` unless set
        pub remotes: BTreeMap<String, RemoteStatus>,
    }

    impl Default for FakeRepoState {
        fn default() -> Self {
            Self {
                is_repo: true,
                branch: Some("main".to_string()),
                dirty: false,
                origin: Some("git@github.com:lab/project.git".to_string()),
                remotes: BTreeMap::new(),
            }
        }
    }

    /// Fake repository for testing
    #[derive(Clone, Default)]
    pub struct FakeRepo {
        inner: Arc<Mutex<FakeRepoState>>,
    }

    impl FakeRepo {
        pub fn new() -> Self {
            Self::default()
        }

        /// A directory outside any repository
        pub fn not_a_repo() -> Self {
            let repo = Self::default();
            repo.update(|s| s.is_repo = false);
            repo
        }

        pub fn update(&self, f: impl FnOnce(&mut FakeRepoState)) {
            f(&mut self.inner.lock());
        }

        pub fn set_remote(&self, name: &str, status: RemoteStatus) {
            self.inner.lock().remotes.insert(name.to_string(), status);
        }
    }

    impl RepoAdapter for FakeRepo {
        fn is_repo(&self) -> bool {
            self.inner.lock().is_repo
        }

        fn current_branch(&self) -> Result<Option<String>, RepoError> {
            Ok(self.inner.lock().branch.clone())
        }

        fn is_dirty(&self) -> Result<bool, RepoError> {
            Ok(self.inner.lock().dirty)
        }

        fn remotes(&self) -> Result<Vec<String>, RepoError> {
            Ok(self.inner.lock().remotes.keys().cloned().collect())
        }

        fn remote_status(&self, remote: &str, _checkout: &str) -> Result<RemoteStatus, RepoError> {
            Ok(self.inner.lock().remotes.get(remote).cloned().unwrap_or(RemoteStatus::Missing))
        }

        fn origin_url(&self) -> Result<Option<String>, RepoError> {
            Ok(self.inner.lock().origin.clone())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRepo, FakeRepoState};

#[cfg(test)]
#[path = "vcs_tests.rs"]
mod tests;
