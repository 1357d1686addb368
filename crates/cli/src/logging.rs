// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostics go to stderr so stdout stays the launch report.

use tracing_subscriber::EnvFilter;

/// Filter used when `MLAUNCH_LOG` is not set.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

pub fn filter(env: Option<&str>, verbose: bool) -> EnvFilter {
    let fallback = || EnvFilter::new(default_directive(verbose));
    match env {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|e| {
            eprintln!("warning: ignoring invalid {}: {e}", crate::env::LOG);
            fallback()
        }),
        None => fallback(),
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter(crate::env::log_filter().as_deref(), verbose))
        .try_init();
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
