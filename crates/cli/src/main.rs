// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! mlaunch: render and submit SLURM jobs from layered job files.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod args;
mod color;
mod env;
mod exit_error;
mod launch;
mod logging;
mod output;

use args::Args;
use exit_error::ExitError;
use std::process::ExitCode;

fn main() -> ExitCode {
    let argv: Vec<String> =
        std::env::args_os().map(|a| a.to_string_lossy().into_owned()).collect();
    let args = match Args::parse_argv(argv.iter().cloned()) {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return exit_code(ExitError::usage_code(&e));
        }
    };
    logging::init(args.verbose);

    let result = if args.help_md { launch::help_md() } else { launch::run(&args, argv.join(" ")) };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<ExitError>() {
            Some(exit) if exit.code == ExitError::ABORTED => {
                eprintln!("{exit}");
                exit_code(exit.code)
            }
            Some(exit) => {
                eprintln!("error: {exit}");
                exit_code(exit.code)
            }
            None => {
                eprintln!("error: {e:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}
