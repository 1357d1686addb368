// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use regex::Regex;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;
use thiserror::Error;

/// Default submitter program.
pub const SBATCH: &str = "sbatch";

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static SUBMITTED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Submitted batch job (\d+)").expect("constant regex pattern is valid")
});

/// Errors from submit operations
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with {status}: {stderr}")]
    Failed { program: String, status: String, stderr: String },
    #[error("no job id in submitter output: {0:?}")]
    NoJobId(String),
}

/// Adapter for handing a script to the scheduler
pub trait SubmitAdapter {
    /// Submit the script at `script` and return the scheduler's job id
    fn submit(&self, script: &Path) -> Result<String, SubmitError>;
}

/// Submits through the `sbatch` command line.
#[derive(Clone, Debug)]
pub struct SbatchAdapter {
    program: String,
}

impl Default for SbatchAdapter {
    fn default() -> Self {
        Self::new(SBATCH)
    }
}

impl SbatchAdapter {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl SubmitAdapter for SbatchAdapter {
    fn submit(&self, script: &Path) -> Result<String, SubmitError> {
        tracing::debug!(program = %self.program, script = %script.display(), "submitting");
        let output = Command::new(&self.program)
            .arg(script)
            .output()
            .map_err(|source| SubmitError::Spawn { program: self.program.clone(), source })?;

        if !output.status.success() {
            return Err(SubmitError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let job_id = parse_job_id(&stdout)?;
        tracing::info!(%job_id, script = %script.display(), "submitted");
        Ok(job_id)
    }
}

/// Extract the job id from `Submitted batch job <id>`.
pub fn parse_job_id(stdout: &str) -> Result<String, SubmitError> {
    SUBMITTED_PATTERN
        .captures(stdout)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| SubmitError::NoJobId(stdout.trim().to_string()))
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{SubmitAdapter, SubmitError};
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    /// Recorded submission
    #[derive(Debug, Clone)]
    pub struct SubmitCall {
        pub script: PathBuf,
        /// Script text at the time of submission, if it could be read
        pub content: Option<String>,
    }

    struct FakeSubmitState {
        calls: Vec<SubmitCall>,
        next_id: u64,
        fail_calls: HashSet<usize>,
    }

    /// Fake submitter handing out increasing job ids
    #[derive(Clone)]
    pub struct FakeSubmitAdapter {
        inner: Arc<Mutex<FakeSubmitState>>,
    }

    impl Default for FakeSubmitAdapter {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeSubmitState {
                    calls: Vec::new(),
                    next_id: 1000,
                    fail_calls: HashSet::new(),
                })),
            }
        }
    }

    impl FakeSubmitAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make the `n`th submission (0-based) fail
        pub fn fail_call(&self, n: usize) {
            self.inner.lock().fail_calls.insert(n);
        }

        /// Get all recorded submissions, including failed ones
        pub fn calls(&self) -> Vec<SubmitCall> {
            self.inner.lock().calls.clone()
        }
    }

    impl SubmitAdapter for FakeSubmitAdapter {
        fn submit(&self, script: &Path) -> Result<String, SubmitError> {
            let mut state = self.inner.lock();
            let n = state.calls.len();
            state.calls.push(SubmitCall {
                script: script.to_path_buf(),
                content: std::fs::read_to_string(script).ok(),
            });
            if state.fail_calls.contains(&n) {
                return Err(SubmitError::Failed {
                    program: "fake-sbatch".to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: "sbatch: error: Batch job submission failed".to_string(),
                });
            }
            let id = state.next_id;
            state.next_id += 1;
            Ok(id.to_string())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSubmitAdapter, SubmitCall};

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
