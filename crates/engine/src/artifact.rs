// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submission script files kept next to each batch.

use crate::error::JobError;
use std::path::{Path, PathBuf};

/// Names the files of one batch.
///
/// With a job file every script is named after its stem and index; without
/// one the single script is named after its job name.
#[derive(Debug, Clone)]
pub struct ArtifactNamer {
    dir: PathBuf,
    stem: Option<String>,
    stamp: String,
}

impl ArtifactNamer {
    pub fn new(dir: impl Into<PathBuf>, stem: Option<String>, stamp: impl Into<String>) -> Self {
        Self { dir: dir.into(), stem, stamp: stamp.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stamp(&self) -> &str {
        &self.stamp
    }

    /// Script path before the scheduler has assigned an id.
    pub fn pending(&self, index: usize, job_name: &str) -> PathBuf {
        let name = match &self.stem {
            Some(stem) => format!("{stem}_{}_{index}.sbatch", self.stamp),
            None => format!("{job_name}_{}.sbatch", self.stamp),
        };
        self.dir.join(name)
    }

    /// Script path once the job id is known.
    pub fn submitted(&self, job_name: &str, job_id: &str) -> PathBuf {
        let prefix = self.stem.as_deref().unwrap_or(job_name);
        self.dir.join(format!("{prefix}_{job_id}_{}.sbatch", self.stamp))
    }

    /// Summary document path; only batches read from a job file have one.
    pub fn summary(&self) -> Option<PathBuf> {
        let stem = self.stem.as_deref()?;
        Some(self.dir.join(format!("{stem}_{}.yaml", self.stamp)))
    }
}

/// Scheduler log of a job: `<outdir>/<job_name>-<id>.out`.
pub fn output_file(outdir: &str, job_name: &str, job_id: &str) -> PathBuf {
    Path::new(outdir).join(format!("{job_name}-{job_id}.out"))
}

/// Lines appended to a submitted script.
pub fn footer(job_id: &str, output_file: &Path) -> String {
    format!("\n# SLURM_JOB_ID: {job_id}\n# Output file: {}\n", output_file.display())
}

/// Write `text` to `path`, creating parent directories.
pub fn write_script(path: &Path, text: &str) -> Result<(), JobError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(JobError::write(parent))?;
    }
    std::fs::write(path, text).map_err(JobError::write(path))
}

/// Move a submitted script to its final name and append the footer.
pub fn finalize(
    pending: &Path,
    submitted: &Path,
    text: &str,
    footer: &str,
) -> Result<(), JobError> {
    std::fs::rename(pending, submitted).map_err(JobError::write(submitted))?;
    std::fs::write(submitted, format!("{text}{footer}")).map_err(JobError::write(submitted))
}

#[cfg(test)]
#[path = "artifact_tests.rs"]
mod tests;
