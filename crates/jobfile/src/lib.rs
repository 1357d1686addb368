// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ml-jobfile: job file parsing, layer resolution and template rendering

pub mod defaults;
pub mod find;
pub mod parser;
pub mod resolve;
pub mod spec;
pub mod template;

pub use defaults::{Defaults, DEFAULT_TEMPLATE};
pub use find::{
    find_jobs_file, find_template, FindError, JobsLocation, TemplateSource, BUILTIN_TEMPLATE,
    OTHER_SUBDIR,
};
pub use parser::{load_job_file, parse_job_file, Format, JobFile, ParseError};
pub use resolve::{resolve, CliOverrides, ResolveError, ResolvedJob, SLURM_FIELDS};
pub use spec::{JobSpec, SpecError};
pub use template::{clean_sbatch_params, placeholders, render, DerivedFields, RenderError};
