// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path expansion for configured locations (`$root/logs`, `~/venvs/ml`, ...)

use regex::{Captures, Regex};
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

/// `$name` or `${name}`
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(\w+)\}|\$(\w+)").expect("constant regex pattern is valid")
});

/// Expands placeholders and environment variables and anchors relative paths
/// at the repository root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    repo_name: String,
    home: Option<PathBuf>,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let repo_name =
            root.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        Self { root, repo_name, home: dirs::home_dir() }
    }

    /// Override the home directory used for `~`.
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    /// Substitute `$root`, `$repoName` and environment variables.
    pub fn expand(&self, raw: &str) -> String {
        self.expand_with(raw, |name| std::env::var(name).ok())
    }

    /// [`expand`](Self::expand) with an explicit variable lookup. Unknown
    /// variables are left in place.
    pub fn expand_with(&self, raw: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
        let root = self.root.to_string_lossy();
        VAR_PATTERN
            .replace_all(raw, |caps: &Captures| {
                let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
                match name {
                    "root" => root.to_string(),
                    "repoName" => self.repo_name.clone(),
                    _ => lookup(name).unwrap_or_else(|| caps[0].to_string()),
                }
            })
            .into_owned()
    }

    /// Expand and make absolute.
    pub fn resolve(&self, raw: &str) -> PathBuf {
        self.resolve_with(raw, |name| std::env::var(name).ok())
    }

    pub fn resolve_with(&self, raw: &str, lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
        let expanded = self.expand_with(raw, lookup);
        let path = match (expanded.strip_prefix('~'), &self.home) {
            (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => {
                home.join(rest.trim_start_matches('/'))
            }
            _ => PathBuf::from(expanded),
        };
        normalize(&self.root.join(path))
    }

    /// Short form for messages: `$root/...` or `~/...` when possible.
    pub fn display(&self, path: &Path) -> String {
        if let Ok(rest) = path.strip_prefix(&self.root) {
            return join_display("$root", rest);
        }
        if let Some(rest) = self.home.as_deref().and_then(|home| path.strip_prefix(home).ok()) {
            return join_display("~", rest);
        }
        path.display().to_string()
    }
}

fn join_display(prefix: &str, rest: &Path) -> String {
    if rest.as_os_str().is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}/{}", rest.display())
    }
}

/// Lexically remove `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
