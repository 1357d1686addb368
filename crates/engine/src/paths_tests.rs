// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn resolver() -> PathResolver {
    PathResolver::new("/work/project").with_home(Some(PathBuf::from("/home/me")))
}

fn env(name: &str) -> Option<String> {
    match name {
        "SCRATCH" => Some("/scratch/me".to_string()),
        _ => None,
    }
}

#[yare::parameterized(
    root_var       = { "$root/logs",             "/work/project/logs" },
    braced_root    = { "${root}/logs",           "/work/project/logs" },
    repo_name      = { "/tmp/$repoName",         "/tmp/project" },
    env_var        = { "$SCRATCH/runs",          "/scratch/me/runs" },
    unknown_kept   = { "$NOPE/x",                "$NOPE/x" },
    plain          = { "logs",                   "logs" },
)]
fn expansion(raw: &str, expected: &str) {
    assert_eq!(resolver().expand_with(raw, env), expected);
}

#[yare::parameterized(
    relative       = { "logs/slurm",             "/work/project/logs/slurm" },
    absolute       = { "/data/out",              "/data/out" },
    tilde          = { "~/venvs/ml",             "/home/me/venvs/ml" },
    bare_tilde     = { "~",                      "/home/me" },
    tilde_user     = { "~bob/x",                 "/work/project/~bob/x" },
    dot_segments   = { "$root/a/../b/./c",       "/work/project/b/c" },
    env_absolute   = { "$SCRATCH/runs",          "/scratch/me/runs" },
)]
fn resolution(raw: &str, expected: &str) {
    assert_eq!(resolver().resolve_with(raw, env), PathBuf::from(expected));
}

#[test]
fn display_shortens_root_and_home() {
    let r = resolver();
    assert_eq!(r.display(Path::new("/work/project/logs/a.out")), "$root/logs/a.out");
    assert_eq!(r.display(Path::new("/work/project")), "$root");
    assert_eq!(r.display(Path::new("/home/me/x")), "~/x");
    assert_eq!(r.display(Path::new("/etc/x")), "/etc/x");
}

#[test]
#[serial]
fn expand_reads_process_environment() {
    std::env::set_var("MLAUNCH_PATHS_TEST", "/from/env");
    assert_eq!(resolver().expand("$MLAUNCH_PATHS_TEST/a"), "/from/env/a");
    std::env::remove_var("MLAUNCH_PATHS_TEST");
    assert_eq!(resolver().expand("$MLAUNCH_PATHS_TEST/a"), "$MLAUNCH_PATHS_TEST/a");
}
