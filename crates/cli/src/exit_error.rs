// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error carrying the process exit code.
//!
//! `launch` returns `ExitError` instead of calling `std::process::exit()`,
//! so `main()` owns process termination.

use std::fmt;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    /// Configuration or environment problem that stopped the batch.
    pub const FATAL: i32 = 1;
    /// The user declined a confirmation prompt.
    pub const ABORTED: i32 = 2;

    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(Self::FATAL, message)
    }

    pub fn aborted() -> Self {
        Self::new(Self::ABORTED, "aborted, nothing submitted")
    }

    /// Exit code for a failed command-line parse. Help and version requests
    /// exit cleanly; usage errors are fatal so they never read as a declined
    /// prompt.
    pub fn usage_code(err: &clap::Error) -> i32 {
        if err.use_stderr() {
            Self::FATAL
        } else {
            0
        }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
