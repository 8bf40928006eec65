//! Behavioral specs for `recur-scan check-features`.

use crate::prelude::*;

/// > The repository's own feature functions are all tested
#[test]
fn check_features_passes_on_repository() {
    recur_scan_cmd()
        .args(["check-features", "--color", "never"])
        .current_dir(repo_root())
        .assert()
        .success()
        .stdout(predicates::str::starts_with("PASS all "));
}

/// > Untested functions are listed and exit code is 1
#[test]
fn check_features_fails_on_untested() {
    let project = Project::empty();
    project.file("src/features.rs", "pub fn is_phone() {}\npub fn is_utility() {}\npub fn compute_features() {}\n");
    project.file("src/features_tests.rs", "#[test]\nfn is_phone_matches() { is_phone(); }\n");

    project
        .run(&[
            "check-features",
            "--source",
            "src/features.rs",
            "--tests",
            "src/features_tests.rs",
            "--color",
            "never",
        ])
        .code(1)
        .stdout(predicates::str::contains("FAIL 1 public functions"))
        .stdout(predicates::str::contains("  - is_utility"));
}

/// > JSON output lists untested functions
#[test]
fn check_features_json() {
    let project = Project::empty();
    project.file("src/features.rs", "pub fn is_phone() {}\n");
    project.file("src/features_tests.rs", "");

    let assert = project
        .run(&[
            "check-features",
            "--source",
            "src/features.rs",
            "--tests",
            "src/features_tests.rs",
            "--output",
            "json",
        ])
        .code(1);
    let report: serde_json::Value = serde_json::from_str(&stdout_of(&assert)).unwrap();
    assert_eq!(report["untested"], serde_json::json!(["is_phone"]));
}

/// > Exclusions come from config
#[test]
fn check_features_config_exclude() {
    let project = Project::with_config(
        "version = 1\n[check_features]\nsource = \"f.rs\"\ntests = \"t.rs\"\nexclude = [\"helper\"]\n",
    );
    project.file("f.rs", "pub fn helper() {}\n");
    project.file("t.rs", "");

    project.run(&["check-features"]).success();
}

/// > A missing source file is an internal error
#[test]
fn check_features_missing_source_exits_3() {
    let project = Project::empty();
    project.run(&["check-features"]).code(3);
}
