// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Helpers shared by the specs: a temporary repository and a fluent wrapper
//! around the `mlaunch` binary.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::OnceLock;

/// Path of the `mlaunch` binary next to the spec executable, built on first use.
fn binary() -> &'static Path {
    static BINARY: OnceLock<PathBuf> = OnceLock::new();
    BINARY.get_or_init(|| {
        let exe = std::env::current_exe().expect("spec executable path");
        let target = exe.parent().and_then(Path::parent).expect("target directory");
        let binary = target.join("mlaunch");
        if !binary.is_file() {
            let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
            let mut build = std::process::Command::new(cargo);
            build.args(["build", "--quiet", "-p", "mlaunch", "--bin", "mlaunch"]);
            if target.ends_with("release") {
                build.arg("--release");
            }
            let status = build.current_dir(env!("CARGO_MANIFEST_DIR")).status().expect("cargo");
            assert!(status.success(), "building mlaunch failed");
        }
        binary
    })
}

/// `mlaunch` with a clean environment and colors off.
pub fn cli() -> Cli {
    let mut cmd = assert_cmd::Command::new(binary());
    cmd.env("NO_COLOR", "1")
        .env_remove("COLOR")
        .env_remove("MLAUNCH_ROOT")
        .env_remove("MLAUNCH_LOG")
        .env_remove("MLAUNCH_SBATCH");
    Cli { cmd }
}

pub struct Cli {
    cmd: assert_cmd::Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cmd.current_dir(dir);
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.cmd.write_stdin(input.to_string());
        self
    }

    /// Run and require exit status 0.
    pub fn passes(self) -> Run {
        self.exits_with(0)
    }

    /// Run and require the given exit status.
    pub fn exits_with(mut self, code: i32) -> Run {
        let run = Run::from(self.cmd.output().expect("spawn mlaunch"));
        assert_eq!(run.code, Some(code), "unexpected exit status\n{run}");
        run
    }
}

/// Captured result of one invocation.
pub struct Run {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for Run {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl std::fmt::Display for Run {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "--- stdout ---\n{}\n--- stderr ---\n{}", self.stdout, self.stderr)
    }
}

impl Run {
    pub fn stdout_has(&self, needle: &str) -> &Self {
        assert!(self.stdout.contains(needle), "stdout lacks {needle:?}\n{self}");
        self
    }

    pub fn stdout_lacks(&self, needle: &str) -> &Self {
        assert!(!self.stdout.contains(needle), "stdout has {needle:?}\n{self}");
        self
    }

    pub fn stderr_has(&self, needle: &str) -> &Self {
        assert!(self.stderr.contains(needle), "stderr lacks {needle:?}\n{self}");
        self
    }
}

/// A throwaway repository root.
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().expect("tempdir") }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the root, creating parents.
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, content).expect("write file");
        path
    }

    /// A fake `sbatch` that records its argument and prints a job id.
    pub fn fake_sbatch(&self, first_id: u32) -> PathBuf {
        let counter = self.path().join(".sbatch-counter");
        let log = self.path().join(".sbatch-calls");
        let script = format!(
            "#!/bin/sh\n\
             n=$(cat '{counter}' 2>/dev/null || echo {first_id})\n\
             echo \"$1\" >> '{log}'\n\
             echo $((n + 1)) > '{counter}'\n\
             echo \"Submitted batch job $n\"\n",
            counter = counter.display(),
            log = log.display(),
        );
        let path = self.file(".bin/sbatch", &script);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
        path
    }

    /// Script paths the fake `sbatch` received, in order.
    pub fn sbatch_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.path().join(".sbatch-calls"))
            .map(|s| s.lines().map(String::from).collect())
            .unwrap_or_default()
    }

    /// `mlaunch` rooted at this project.
    pub fn mlaunch(&self) -> Cli {
        cli().env("MLAUNCH_ROOT", self.path()).current_dir(self.path())
    }

    /// Files under `rel`, relative to it, sorted.
    pub fn files_under(&self, rel: &str) -> Vec<String> {
        let base = self.path().join(rel);
        let mut found = Vec::new();
        let mut stack = vec![base.clone()];
        while let Some(dir) = stack.pop() {
            let Ok(entries) = std::fs::read_dir(&dir) else { continue };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                } else if let Ok(rel) = path.strip_prefix(&base) {
                    found.push(rel.display().to_string());
                }
            }
        }
        found.sort();
        found
    }
}
