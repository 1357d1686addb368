// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job file parsing (YAML, TOML and JSON)

use crate::spec::{JobSpec, SpecError};
use ml_core::Value;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Supported document formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
    Json,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Format::Yaml => "yaml",
            Format::Toml => "toml",
            Format::Json => "json",
        })
    }
}

impl Format {
    /// Recognized extensions, in lookup order.
    pub const EXTENSIONS: &'static [&'static str] = &["yaml", "yml", "toml", "json"];

    pub fn from_path(path: &Path) -> Option<Format> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Format::Yaml),
            "toml" => Some(Format::Toml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// Errors from loading a job file or a defaults file
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("job file has no `jobs` list")]
    MissingJobs,
    #[error("job file `jobs` list is empty")]
    EmptyJobs,
    #[error("invalid `shared` section: {0}")]
    Shared(#[source] SpecError),
    #[error("unsupported file extension for {} (expected .yaml, .yml, .toml or .json)", .0.display())]
    UnknownFormat(PathBuf),
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Deserialize `content` written in `format`.
pub fn from_str<T: DeserializeOwned>(content: &str, format: Format) -> Result<T, ParseError> {
    Ok(match format {
        Format::Yaml => serde_yaml::from_str(content)?,
        Format::Toml => toml::from_str(content)?,
        Format::Json => serde_json::from_str(content)?,
    })
}

/// Read and deserialize a file, picking the format from its extension.
pub fn from_path<T: DeserializeOwned>(path: &Path) -> Result<T, ParseError> {
    let format = Format::from_path(path).ok_or_else(|| ParseError::UnknownFormat(path.into()))?;
    let content = std::fs::read_to_string(path)
        .map_err(|source| ParseError::Io { path: path.into(), source })?;
    from_str(&content, format)
}

/// A parsed job file: the shared layer and the raw per-job entries.
///
/// `shared` is validated up front since every job depends on it. Job entries
/// stay raw until resolved, so one malformed entry only fails its own job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobFile {
    shared: JobSpec,
    jobs: Vec<Value>,
}

#[derive(Deserialize)]
struct RawJobFile {
    #[serde(default)]
    shared: Option<Value>,
    #[serde(default)]
    jobs: Option<Vec<Value>>,
}

impl JobFile {
    /// A batch of one empty job, used when no job file is given.
    pub fn single() -> Self {
        Self { shared: JobSpec::default(), jobs: vec![Value::Null] }
    }

    pub fn shared(&self) -> &JobSpec {
        &self.shared
    }

    /// Raw entry of job `index`.
    pub fn job(&self, index: usize) -> Option<&Value> {
        self.jobs.get(index)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Always false for a successfully parsed file.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Parse job file text.
pub fn parse_job_file(content: &str, format: Format) -> Result<JobFile, ParseError> {
    let raw: RawJobFile = from_str(content, format)?;
    let jobs = raw.jobs.ok_or(ParseError::MissingJobs)?;
    if jobs.is_empty() {
        return Err(ParseError::EmptyJobs);
    }
    let shared = match raw.shared {
        Some(value) => JobSpec::from_value(&value).map_err(ParseError::Shared)?,
        None => JobSpec::default(),
    };
    tracing::debug!(jobs = jobs.len(), %format, "parsed job file");
    Ok(JobFile { shared, jobs })
}

/// Read and parse a job file from disk.
pub fn load_job_file(path: &Path) -> Result<JobFile, ParseError> {
    let format = Format::from_path(path).ok_or_else(|| ParseError::UnknownFormat(path.into()))?;
    let content = std::fs::read_to_string(path)
        .map_err(|source| ParseError::Io { path: path.into(), source })?;
    parse_job_file(&content, format)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
