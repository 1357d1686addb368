// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launching batches end to end against a fake `sbatch`.

use crate::prelude::*;

const JOBS: &str = "\
shared:
  slurm:
    partition: main
  script:
    optimizer:
      lr: 0.001
jobs:
  - {}
  - slurm:
      mem: 64G
    script:
      optimizer:
        lr: 0.01
";

const SCRIPTS: &str = "external/launched_sbatch_scripts";

fn project() -> Project {
    let project = Project::empty();
    project.file("config/jobs/exp.yaml", JOBS);
    project
}

fn with_sbatch(project: &Project) -> Cli {
    let sbatch = project.fake_sbatch(1000);
    project.mlaunch().env("MLAUNCH_SBATCH", &sbatch)
}

#[test]
fn dry_run_prints_scripts_and_writes_nothing() {
    let project = project();
    project
        .mlaunch()
        .args(&["--jobs", "exp", "--dry_run"])
        .passes()
        .stdout_has("<sbatch>")
        .stdout_has("#SBATCH --partition=main")
        .stdout_has("#SBATCH --mem=64G")
        .stdout_has("python main.py optimizer.lr=0.001\n")
        .stdout_has("python main.py optimizer.lr=0.01\n")
        .stdout_has("DRY RUN: 2 of 2 job(s) rendered, nothing submitted")
        .stdout_lacks("#SBATCH --time=");
    assert!(project.files_under(SCRIPTS).is_empty());
    assert!(project.sbatch_calls().is_empty());
}

#[test]
fn trailing_arguments_are_forwarded_to_every_job() {
    let project = project();
    project
        .mlaunch()
        .args(&["--jobs", "exp", "seed=3", "--dry_run", "--flag"])
        .passes()
        .stdout_has("python main.py optimizer.lr=0.001 seed=3 --flag\n")
        .stdout_has("python main.py optimizer.lr=0.01 seed=3 --flag\n");
}

#[test]
fn command_line_fields_win_over_the_job_file() {
    let project = project();
    project
        .mlaunch()
        .args(&["--jobs", "exp", "--dry_run", "--partition", "unkillable"])
        .args(&["--script_path", "train.py"])
        .passes()
        .stdout_has("#SBATCH --partition=unkillable")
        .stdout_lacks("#SBATCH --partition=main")
        .stdout_has("python train.py optimizer.lr=0.01");
}

#[test]
fn forced_batch_submits_renames_and_summarizes() {
    let project = project();
    with_sbatch(&project)
        .args(&["--jobs", "exp", "--force"])
        .passes()
        .stdout_has("Submitted batch job 1000")
        .stdout_has("Submitted batch job 1001")
        .stdout_has("All jobs submitted: 1000 1001")
        .stdout_has("Summary: $root/external/launched_sbatch_scripts/exp_");

    assert_eq!(project.sbatch_calls().len(), 2);
    let files = project.files_under(SCRIPTS);
    assert_eq!(files.len(), 3, "{files:?}");
    assert!(files[0].starts_with("exp_1000_") && files[0].ends_with(".sbatch"));
    assert!(files[1].starts_with("exp_1001_") && files[1].ends_with(".sbatch"));
    assert!(files[2].ends_with(".yaml"));

    let script = std::fs::read_to_string(project.path().join(SCRIPTS).join(&files[0])).unwrap();
    assert!(script.contains("# SLURM_JOB_ID: 1000\n"));
    let summary = std::fs::read_to_string(project.path().join(SCRIPTS).join(&files[2])).unwrap();
    assert!(summary.starts_with(JOBS));
    let (_, tail) = summary.split_once("\n# All jobs submitted").unwrap();
    let out = |id: &str| {
        project.path().join(format!("logs/slurm/mlaunch-{id}.out")).display().to_string()
    };
    let expected =
        format!(": 1000 1001\n\n# Job Output files:\n#  • {}\n#  • {}\n", out("1000"), out("1001"));
    similar_asserts::assert_eq!(tail, expected.as_str());
    assert!(project.path().join("logs/slurm").is_dir());
}

#[test]
fn declining_the_prompt_exits_2() {
    let project = project();
    let run = with_sbatch(&project).args(&["--jobs", "exp"]).stdin("n\n").exits_with(2);
    run.stderr_has("Submit 2 jobs? [y/N]").stderr_has("aborted");
    assert!(project.sbatch_calls().is_empty());
}

#[test]
fn accepting_the_prompt_submits() {
    let project = project();
    with_sbatch(&project)
        .args(&["--jobs", "exp"])
        .stdin("y\n")
        .passes()
        .stdout_has("All jobs submitted: 1000 1001");
}

#[test]
fn without_job_file_one_job_is_launched() {
    let project = Project::empty();
    with_sbatch(&project)
        .args(&["--force", "--job_name", "probe", "lr=1"])
        .passes()
        .stdout_has("All jobs submitted: 1000");
    let files = project.files_under(SCRIPTS);
    assert_eq!(files.len(), 1, "{files:?}");
    assert!(files[0].starts_with("_other_/probe_1000_"));
}

#[test]
fn failing_job_is_skipped_and_the_rest_submitted() {
    let project = Project::empty();
    project.file(
        "config/jobs/exp.yaml",
        "jobs:\n  - slurm:\n      comment: first\n  - {}\n  - slurm:\n      comment: third\n",
    );
    project.file(
        "config/templates/commented.sbatch",
        "#!/bin/bash\n#SBATCH --comment={comment}\n{command}\n",
    );
    with_sbatch(&project)
        .args(&["--jobs", "exp", "--force", "--template", "commented.sbatch"])
        .passes()
        .stdout_has("All jobs submitted: 1000 1001")
        .stdout_has("job 1 skipped: template: unresolved template placeholder(s): comment");
    assert_eq!(project.sbatch_calls().len(), 2);
}

#[test]
fn missing_job_file_is_fatal() {
    let project = Project::empty();
    project
        .mlaunch()
        .args(&["--jobs", "nope", "--force"])
        .exits_with(1)
        .stderr_has("error: could not find job file `nope`");
}

#[test]
fn malformed_job_file_is_fatal() {
    let project = Project::empty();
    project.file("config/jobs/bad.yaml", "shared: {}\n");
    project.mlaunch().args(&["--jobs", "bad", "--force"]).exits_with(1).stderr_has("error:");
    assert!(project.sbatch_calls().is_empty());
}
