// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn write_config(root: &Path, name: &str, content: &str) {
    let dir = root.join("config");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(name), content).unwrap();
}

#[test]
fn builtin_values_without_a_file() {
    let tmp = TempDir::new().unwrap();
    let defaults = Defaults::discover(tmp.path()).unwrap();
    assert_eq!(defaults, Defaults::default());
    assert_eq!(defaults.template, DEFAULT_TEMPLATE);
    assert!(defaults.allow_no_checkout);
}

#[test]
fn file_overrides_only_what_it_names() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), "launch.toml", "partition = \"main\"\ncpus_per_task = 8\n");
    let defaults = Defaults::discover(tmp.path()).unwrap();
    assert_eq!(defaults.partition, "main");
    assert_eq!(defaults.cpus_per_task, 8);
    assert_eq!(defaults.mem, "32G");
}

#[test]
fn yaml_defaults_file() {
    let tmp = TempDir::new().unwrap();
    write_config(
        tmp.path(),
        "launch.yaml",
        "modules: anaconda/3 cuda/11.3\nallow_unclean_repo: true\n",
    );
    let defaults = Defaults::discover(tmp.path()).unwrap();
    assert_eq!(defaults.modules.as_deref(), Some("anaconda/3 cuda/11.3"));
    assert!(defaults.allow_unclean_repo);
}

#[test]
fn yaml_is_preferred_over_toml() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), "launch.toml", "mem = \"1G\"\n");
    write_config(tmp.path(), "launch.yaml", "mem: 2G\n");
    assert_eq!(Defaults::discover(tmp.path()).unwrap().mem, "2G");
}

#[test]
fn unknown_field_is_an_error() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), "launch.yaml", "memory: 2G\n");
    let err = Defaults::discover(tmp.path()).unwrap_err();
    assert!(err.to_string().contains("memory"), "{err}");
}

#[test]
fn fields_expose_slurm_subset() {
    let fields = Defaults::default().fields();
    let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
    assert_eq!(keys, SLURM_FIELDS);
    assert_eq!(fields.get("cpus_per_task"), Some(&Value::from(2u32)));
    assert_eq!(fields.get("time"), Some(&Value::Null));
    assert!(fields.get("dry_run").is_none());
}
