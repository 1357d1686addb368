// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch summary: the job file as launched, annotated with what was submitted.

use std::path::PathBuf;

/// Inputs of the summary document.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    /// Job file text as read
    pub source: String,
    /// Command line that launched the batch
    pub command: String,
    pub job_ids: Vec<String>,
    pub output_files: Vec<PathBuf>,
}

impl Summary {
    /// One-line recap of submitted ids.
    pub fn recap(&self) -> String {
        if self.job_ids.is_empty() {
            "No job submitted!".to_string()
        } else {
            format!("All jobs submitted: {}", self.job_ids.join(" "))
        }
    }

    /// The job file text followed by comment lines, so the result is still a
    /// valid job file.
    pub fn render(&self) -> String {
        let mut out = self.source.clone();
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&format!("\n# Command run: {}\n", self.command));
        out.push_str(&format!("\n# {}\n", self.recap()));
        out.push_str("\n# Job Output files:\n");
        for file in &self.output_files {
            out.push_str(&format!("#  • {}\n", file.display()));
        }
        out
    }
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
