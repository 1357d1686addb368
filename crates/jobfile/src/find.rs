// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job file and template discovery

use crate::defaults::DEFAULT_TEMPLATE;
use crate::parser::Format;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Artifact sub-directory used when no job file is given.
pub const OTHER_SUBDIR: &str = "_other_";

/// Text of the built-in submission template.
pub const BUILTIN_TEMPLATE: &str = include_str!("../templates/default.sbatch");

/// Errors from discovery
#[derive(Debug, Error)]
pub enum FindError {
    #[error("could not find job file `{reference}` (looked in {})", .searched.display())]
    JobsNotFound { reference: String, searched: PathBuf },
    #[error("could not find template at {} or {}", .path.display(), .alternative.display())]
    TemplateNotFound { path: PathBuf, alternative: PathBuf },
}

/// A located job file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobsLocation {
    pub path: PathBuf,
    /// Where this file's artifacts go, relative to the artifact root.
    pub artifact_subdir: PathBuf,
}

impl JobsLocation {
    /// File name without extension, used to name artifacts.
    pub fn stem(&self) -> String {
        self.path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
    }
}

/// Directory searched for job files referenced by name.
pub fn jobs_dir(root: &Path) -> PathBuf {
    root.join("config").join("jobs")
}

/// Directory searched for templates referenced by name.
pub fn templates_dir(root: &Path) -> PathBuf {
    root.join("config").join("templates")
}

/// Locate a job file from a path or a short name such as `crystals/pretrain`.
pub fn find_jobs_file(root: &Path, reference: &str) -> Result<JobsLocation, FindError> {
    let direct = Path::new(reference);
    if direct.is_file() {
        let artifact_subdir = direct
            .parent()
            .and_then(Path::file_name)
            .map(PathBuf::from)
            .unwrap_or_default();
        return Ok(JobsLocation { path: direct.to_path_buf(), artifact_subdir });
    }

    let name = short_name(reference);
    let dir = jobs_dir(root);
    let matches: Vec<PathBuf> = Format::EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .filter(|p| p.is_file())
        .collect();

    let Some(path) = matches.first().cloned() else {
        return Err(FindError::JobsNotFound { reference: reference.to_string(), searched: dir });
    };
    if matches.len() > 1 {
        let others: Vec<String> = matches[1..].iter().map(|p| p.display().to_string()).collect();
        tracing::warn!(
            using = %path.display(),
            ignored = ?others,
            "found multiple job files matching `{name}`"
        );
    }

    let artifact_subdir = path
        .parent()
        .and_then(|parent| parent.strip_prefix(&dir).ok())
        .map(Path::to_path_buf)
        .unwrap_or_default();
    tracing::debug!(path = %path.display(), "using job file");
    Ok(JobsLocation { path, artifact_subdir })
}

/// `external/jobs/foo.yaml` → `foo`; `jobs/a/b.toml` → `a/b`.
fn short_name(reference: &str) -> &str {
    let name = Format::EXTENSIONS
        .iter()
        .find_map(|ext| reference.strip_suffix(ext)?.strip_suffix('.'))
        .unwrap_or(reference);
    let name = name.strip_prefix("external/").unwrap_or(name);
    name.strip_prefix("jobs/").unwrap_or(name)
}

/// Where a template comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    File(PathBuf),
    BuiltIn,
}

impl TemplateSource {
    pub fn read(&self) -> std::io::Result<String> {
        match self {
            TemplateSource::File(path) => std::fs::read_to_string(path),
            TemplateSource::BuiltIn => Ok(BUILTIN_TEMPLATE.to_string()),
        }
    }
}

impl std::fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateSource::File(path) => write!(f, "{}", path.display()),
            TemplateSource::BuiltIn => write!(f, "<built-in {DEFAULT_TEMPLATE}>"),
        }
    }
}

/// Locate a template: a file path, else a file of the same name under
/// `config/templates/`, else the built-in template when the default is asked
/// for.
pub fn find_template(root: &Path, reference: &Path) -> Result<TemplateSource, FindError> {
    if reference.is_file() {
        return Ok(TemplateSource::File(reference.to_path_buf()));
    }
    let file_name = reference.file_name().map(PathBuf::from).unwrap_or_default();
    let alternative = templates_dir(root).join(&file_name);
    if alternative.is_file() {
        return Ok(TemplateSource::File(alternative));
    }
    if file_name.as_os_str() == DEFAULT_TEMPLATE {
        return Ok(TemplateSource::BuiltIn);
    }
    Err(FindError::TemplateNotFound { path: reference.to_path_buf(), alternative })
}

#[cfg(test)]
#[path = "find_tests.rs"]
mod tests;
