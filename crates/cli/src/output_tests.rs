// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ml_engine::{BatchState, JobError, JobFailure};
use serial_test::serial;
use std::path::PathBuf;

fn plain() {
    std::env::set_var("NO_COLOR", "1");
}

fn paths() -> PathResolver {
    PathResolver::new("/repo").with_home(Some(PathBuf::from("/home/me")))
}

fn record(index: usize, job_ref: JobRef) -> JobRecord {
    JobRecord {
        index,
        script_path: PathBuf::from(format!("/repo/external/scripts/exp_{job_ref}_stamp.sbatch")),
        output_file: PathBuf::from(format!("/home/me/logs/mlaunch-{job_ref}.out")),
        job_ref,
        tokens: Vec::new(),
        script: "#!/bin/bash\n#SBATCH --mem=32G\n".to_string(),
    }
}

fn report(dry_run: bool, jobs: Vec<JobRecord>) -> BatchReport {
    BatchReport {
        state: BatchState::Done,
        total: 2,
        dry_run,
        jobs_file: None,
        warnings: Vec::new(),
        jobs,
        failures: Vec::new(),
        summary: None,
        summary_path: Some(PathBuf::from("/repo/external/scripts/exp_stamp.yaml")),
        summary_written: !dry_run,
    }
}

#[test]
#[serial]
fn frame_indents_every_line() {
    plain();
    let frame = sbatch_frame("#!/bin/bash\necho hi\n");
    let lines: Vec<&str> = frame.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains(" <sbatch> "));
    assert_eq!(lines[1], "     #!/bin/bash");
    assert_eq!(lines[2], "     echo hi");
    assert!(lines[3].contains(" </sbatch> "));
    assert_eq!(lines[0].len(), lines[3].len());
}

#[test]
#[serial]
fn submitted_job_line_shortens_paths() {
    plain();
    let line = job_line(&record(0, JobRef::Submitted("4242".into())), &paths());
    assert_eq!(
        line,
        "Submitted batch job 4242\n  script: $root/external/scripts/exp_4242_stamp.sbatch\n  output: ~/logs/mlaunch-4242.out\n"
    );
}

#[test]
#[serial]
fn dry_run_job_line() {
    plain();
    let line = job_line(&record(1, JobRef::DryRun), &paths());
    assert_eq!(
        line,
        "DRY RUN: job 1 would be written to $root/external/scripts/exp_dry-run_stamp.sbatch\n"
    );
}

#[test]
#[serial]
fn recap_lists_ids_summary_and_skipped_jobs() {
    plain();
    let mut report = report(false, vec![record(0, JobRef::Submitted("7".into()))]);
    report.failures.push(JobFailure { index: 1, error: JobError::NoOrigin });

    let text = recap(&report, &paths());
    assert!(text.starts_with("All jobs submitted: 7\n"), "{text}");
    assert!(text.contains("Summary: $root/external/scripts/exp_stamp.yaml\n"));
    assert!(text.contains("✗ job 1 skipped: code_dir mentions SLURM_TMPDIR"));
}

#[test]
#[serial]
fn recap_without_submissions() {
    plain();
    let text = recap(&report(false, Vec::new()), &paths());
    assert!(text.starts_with("No job submitted!\n"), "{text}");
}

#[test]
#[serial]
fn dry_run_recap_mentions_the_unwritten_summary() {
    plain();
    let text = recap(&report(true, vec![record(0, JobRef::DryRun)]), &paths());
    assert_eq!(
        text,
        "DRY RUN: 1 of 2 job(s) rendered, nothing submitted\n\
         DRY RUN: summary would be written to $root/external/scripts/exp_stamp.yaml\n"
    );
}

#[test]
#[serial]
fn warnings_are_bulleted() {
    plain();
    let text = warnings_block(&[
        RepoWarning::Dirty,
        RepoWarning::Behind { remote: "origin".into(), checkout: "main".into(), commits: 3 },
    ]);
    assert_eq!(
        text,
        "Repository warnings:\n  • Your repo contains uncommitted changes. \
         They will *not* be available when cloning happens within the job.\n  \
         • You are 3 commits behind origin/main\n"
    );
}

#[test]
fn configuration_is_yaml_of_every_setting() {
    let yaml = configuration(&Defaults::default()).unwrap();
    assert!(yaml.contains("job_name: mlaunch\n"));
    assert!(yaml.contains("cpus_per_task: 2\n"));
    assert!(yaml.contains("allow_no_checkout: true\n"));
}

#[test]
fn example_jobs_start_at_shared() {
    let root = tempfile::tempdir().unwrap();
    assert_eq!(example_jobs(root.path()), EXAMPLE_JOBS);

    let dir = root.path().join("config/jobs");
    std::fs::create_dir_all(&dir).unwrap();
    let text = "# header\n\nshared:\n  script: {}\njobs:\n  - {}\n";
    std::fs::write(dir.join("example-jobs.yaml"), text).unwrap();
    assert_eq!(example_jobs(root.path()), "shared:\n  script: {}\njobs:\n  - {}");
}

#[test]
fn help_markdown_sections() {
    let md = help_markdown("Usage: mlaunch [OPTIONS]\n", "job_name: mlaunch\n", "jobs:\n  - {}");
    assert!(md.starts_with("# 🤝 mlaunch help\n"));
    assert!(md.contains("```sh\nUsage: mlaunch [OPTIONS]\n```"));
    assert!(md.contains("```yaml\njob_name: mlaunch\n```"));
    assert!(md.contains("```yaml\njobs:\n  - {}\n```"));
    assert!(!md.contains("{yaml_example}"));
    assert!(md.contains("`model: {__value__: mlp, hidden: 64}`"));
}
