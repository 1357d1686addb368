// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line options.
//!
//! Anything clap does not know about is split off before parsing and
//! forwarded to the launched script as a literal override token.

use crate::color;
use clap::{CommandFactory, Parser};
use ml_jobfile::{CliOverrides, Defaults};

#[derive(Debug, Default, Parser)]
#[command(
    name = "mlaunch",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("MLAUNCH_BUILD_HASH"), ")"),
    about = "Render and submit SLURM jobs from a job file",
    styles = color::styles(),
    after_help = "Unrecognized arguments are forwarded to the launched script, \
                  e.g. `mlaunch --jobs sweep optimizer.lr=0.01`."
)]
pub struct Args {
    /// Print the full help as Markdown and exit
    #[arg(long = "help-md")]
    pub help_md: bool,

    /// Job name (#SBATCH --job-name)
    #[arg(long = "job_name", value_name = "NAME")]
    pub job_name: Option<String>,
    /// Directory of the scheduler output files
    #[arg(long = "outdir", value_name = "DIR")]
    pub outdir: Option<String>,
    #[arg(long = "cpus_per_task", value_name = "N")]
    pub cpus_per_task: Option<u32>,
    #[arg(long = "mem", value_name = "MEM")]
    pub mem: Option<String>,
    #[arg(long = "gres", value_name = "GRES")]
    pub gres: Option<String>,
    #[arg(long = "partition", value_name = "PARTITION")]
    pub partition: Option<String>,
    /// Time limit, e.g. 1-12:00:00
    #[arg(long = "time", value_name = "TIME")]
    pub time: Option<String>,
    /// Modules to load, space separated
    #[arg(long = "modules", value_name = "MODULES")]
    pub modules: Option<String>,
    /// Conda environment to activate
    #[arg(long = "conda_env", value_name = "ENV")]
    pub conda_env: Option<String>,
    /// Virtualenv to activate
    #[arg(long = "venv", value_name = "PATH")]
    pub venv: Option<String>,
    /// Submission template, a path or a name under config/templates
    #[arg(long = "template", value_name = "TEMPLATE")]
    pub template: Option<String>,
    /// Directory to run from; include $SLURM_TMPDIR to clone the repository there
    #[arg(long = "code_dir", value_name = "DIR")]
    pub code_dir: Option<String>,
    /// Branch or commit to check out in the clone
    #[arg(long = "git_checkout", value_name = "REF")]
    pub git_checkout: Option<String>,
    /// Job file, a path or a name under config/jobs
    #[arg(long = "jobs", value_name = "JOBS")]
    pub jobs: Option<String>,
    /// Program running the script
    #[arg(long = "command", value_name = "COMMAND")]
    pub command: Option<String>,
    #[arg(long = "script_path", value_name = "PATH")]
    pub script_path: Option<String>,
    /// Where submission scripts and summaries are kept
    #[arg(long = "sbatch_files_root", value_name = "DIR")]
    pub sbatch_files_root: Option<String>,

    /// Render and print without writing or submitting anything
    #[arg(long = "dry_run")]
    pub dry_run: bool,
    /// Print configuration and rendered scripts
    #[arg(long = "verbose")]
    pub verbose: bool,
    /// Skip every confirmation prompt
    #[arg(long = "force")]
    pub force: bool,
    /// Do not warn about uncommitted changes
    #[arg(long = "allow_unclean_repo")]
    pub allow_unclean_repo: bool,
    /// Do not warn when no checkout is given
    #[arg(long = "allow_no_checkout")]
    pub allow_no_checkout: bool,
    /// Clone over https instead of ssh
    #[arg(long = "clone_as_https")]
    pub clone_as_https: bool,

    /// Arguments clap did not recognize, in command-line order
    #[arg(skip)]
    pub overrides: Vec<String>,
}

impl Args {
    /// Parse a full argv (program name first).
    pub fn parse_argv<I, T>(argv: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut cmd = Self::command();
        cmd.build();
        let (known, unknown) = split_known(&cmd, argv.into_iter().map(Into::into));
        let mut args = Self::try_parse_from(known)?;
        args.overrides = unknown;
        Ok(args)
    }

    /// Apply options on top of the loaded launch defaults.
    pub fn apply(&self, settings: &mut Defaults) {
        let set = |slot: &mut String, value: &Option<String>| {
            if let Some(value) = value {
                slot.clone_from(value);
            }
        };
        let set_opt = |slot: &mut Option<String>, value: &Option<String>| {
            if value.is_some() {
                slot.clone_from(value);
            }
        };
        set(&mut settings.job_name, &self.job_name);
        set(&mut settings.outdir, &self.outdir);
        if let Some(cpus) = self.cpus_per_task {
            settings.cpus_per_task = cpus;
        }
        set(&mut settings.mem, &self.mem);
        set(&mut settings.gres, &self.gres);
        set(&mut settings.partition, &self.partition);
        set_opt(&mut settings.time, &self.time);
        set_opt(&mut settings.modules, &self.modules);
        set_opt(&mut settings.conda_env, &self.conda_env);
        set_opt(&mut settings.venv, &self.venv);
        set(&mut settings.template, &self.template);
        set(&mut settings.code_dir, &self.code_dir);
        set_opt(&mut settings.git_checkout, &self.git_checkout);
        set_opt(&mut settings.jobs, &self.jobs);
        set(&mut settings.command, &self.command);
        set(&mut settings.script_path, &self.script_path);
        set(&mut settings.sbatch_files_root, &self.sbatch_files_root);

        settings.dry_run |= self.dry_run;
        settings.verbose |= self.verbose;
        settings.force |= self.force;
        settings.allow_unclean_repo |= self.allow_unclean_repo;
        settings.allow_no_checkout |= self.allow_no_checkout;
        settings.clone_as_https |= self.clone_as_https;
    }

    /// The command-line layer: slurm fields given explicitly, then the
    /// forwarded tokens.
    pub fn overrides(&self) -> CliOverrides {
        let text_fields = [
            ("job_name", &self.job_name),
            ("outdir", &self.outdir),
            ("mem", &self.mem),
            ("gres", &self.gres),
            ("partition", &self.partition),
            ("time", &self.time),
            ("modules", &self.modules),
            ("conda_env", &self.conda_env),
            ("venv", &self.venv),
            ("code_dir", &self.code_dir),
            ("git_checkout", &self.git_checkout),
            ("command", &self.command),
            ("script_path", &self.script_path),
        ];
        let mut cli = CliOverrides::new();
        if let Some(cpus) = self.cpus_per_task {
            cli = cli.field("cpus_per_task", cpus);
        }
        for (name, value) in text_fields {
            if let Some(value) = value {
                cli = cli.field(name, value.as_str());
            }
        }
        self.overrides.iter().fold(cli, |cli, token| cli.token(token.as_str()))
    }
}

/// Split `argv` into what `cmd` understands and everything else.
///
/// The program name always stays on the known side. A known option that
/// takes a value keeps its value even when it is written as a separate
/// argument. Everything after a bare `--` is forwarded.
pub fn split_known(
    cmd: &clap::Command,
    argv: impl IntoIterator<Item = String>,
) -> (Vec<String>, Vec<String>) {
    let mut argv = argv.into_iter();
    let mut known: Vec<String> = argv.next().into_iter().collect();
    let mut unknown = Vec::new();

    while let Some(arg) = argv.next() {
        if arg == "--" {
            unknown.extend(argv.by_ref());
            break;
        }
        let Some(option) = lookup(cmd, &arg) else {
            unknown.push(arg);
            continue;
        };
        let inline_value = arg.starts_with("--") && arg.contains('=');
        let takes_value = option.get_action().takes_values();
        known.push(arg);
        if takes_value && !inline_value {
            known.extend(argv.next());
        }
    }
    (known, unknown)
}

fn lookup<'a>(cmd: &'a clap::Command, arg: &str) -> Option<&'a clap::Arg> {
    if let Some(long) = arg.strip_prefix("--") {
        let name = long.split_once('=').map_or(long, |(name, _)| name);
        return cmd.get_arguments().find(|a| a.get_long() == Some(name));
    }
    let mut chars = arg.strip_prefix('-')?.chars();
    let (Some(short), None) = (chars.next(), chars.next()) else {
        return None;
    };
    cmd.get_arguments().find(|a| a.get_short() == Some(short))
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
