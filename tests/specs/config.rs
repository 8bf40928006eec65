//! Behavioral specs for configuration loading.

use crate::prelude::*;

/// > Unknown keys are rejected with exit code 2
#[test]
fn unknown_key_exits_2() {
    let project = Project::with_config("version = 1\n[merge]\ntrain_ration = 0.5\n");
    project
        .run(&["check-features"])
        .code(2)
        .stderr(predicates::str::contains("train_ration"));
}

/// > An unsupported version is rejected
#[test]
fn unsupported_version_exits_2() {
    let project = Project::with_config("version = 2\n");
    project
        .run(&["check-features"])
        .code(2)
        .stderr(predicates::str::contains("unsupported config version 2"));
}

/// > Config is discovered from a subdirectory
#[test]
fn config_discovered_from_subdirectory() {
    let project = Project::with_config("version = 2\n");
    project.file("data/keep", "");

    recur_scan_cmd()
        .args(["check-features"])
        .current_dir(project.path().join("data"))
        .assert()
        .code(2);
}

/// > RECUR_SCAN_CONFIG selects the config file
#[test]
fn config_from_environment() {
    let project = Project::empty();
    project.file("alt.toml", "version = 7\n");

    recur_scan_cmd()
        .args(["check-features"])
        .current_dir(project.path())
        .env("RECUR_SCAN_CONFIG", "alt.toml")
        .assert()
        .code(2)
        .stderr(predicates::str::contains("version 7"));
}

/// > --verbose enables debug logging
#[test]
fn verbose_logs_config_source() {
    let project = Project::with_config("version = 1\n[check_features]\nsource = \"f.rs\"\ntests = \"t.rs\"\n");
    project.file("f.rs", "");
    project.file("t.rs", "");

    project
        .run(&["-v", "check-features"])
        .success()
        .stderr(predicates::str::contains("using config"));
}
