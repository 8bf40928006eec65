//! Behavioral specs for `recur-scan merge`.

use crate::prelude::*;

fn merge_into(project: &Project, extra: &[&str]) -> assert_cmd::assert::Assert {
    let labeled = fixture("labeled");
    let mut args = vec![
        "merge",
        labeled.to_str().unwrap(),
        "--seed",
        "7",
        "--train",
        "out/train.csv",
        "--test",
        "out/test.csv",
    ];
    args.extend_from_slice(extra);
    project.run(&args)
}

/// > Writes train and test files split by user
#[test]
fn merge_writes_train_and_test() {
    let project = Project::empty();
    merge_into(&project, &[]).success();

    let train = project.read("out/train.csv");
    let test = project.read("out/test.csv");
    assert!(train.starts_with("user_id,name,date,amount,recurring\n"));
    assert!(test.starts_with("user_id,name,date,amount,recurring\n"));
    // Two users: one per side.
    let rows = train.lines().count() - 1 + test.lines().count() - 1;
    assert_eq!(rows, 4);
    let train_has_u1 = train.contains("\nu1,");
    let test_has_u1 = test.contains("\nu1,");
    assert!(train_has_u1 != test_has_u1);
}

/// > The weighted majority labels the disputed transaction
#[test]
fn merge_majority_overrules_single_labeler() {
    let project = Project::empty();
    merge_into(&project, &[]).success();

    let all = project.read("out/train.csv") + &project.read("out/test.csv");
    assert!(all.contains("u2,Gym,2024-01-05,30.0,0"));
    assert!(all.contains("u1,Netflix,2024-01-01,15.99,1"));
}

/// > Text output ranks labelers and shows the histogram
#[test]
fn merge_text_report() {
    let project = Project::empty();
    merge_into(&project, &["--color", "never"])
        .success()
        .stdout(predicates::str::contains("Read 12 transactions from 3 files (3 labelers)"))
        .stdout(predicates::str::contains("Majority-vote scores"))
        .stdout(predicates::str::contains("4 consensus transactions (score >= 1.8)"))
        .stdout(predicates::str::contains("\x1b[").not());
}

/// > JSON output exposes labeler metrics
#[test]
fn merge_json_report() {
    let project = Project::empty();
    let assert = merge_into(&project, &["--output", "json"]).success();
    let report: serde_json::Value = serde_json::from_str(&stdout_of(&assert)).unwrap();

    assert_eq!(report["labelers"], serde_json::json!(["alice", "bob", "carol"]));
    assert_eq!(report["consensus_transactions"], 4);
    assert_eq!(report["labeler_metrics"]["carol"]["fp"], 1);
    assert_eq!(report["labeler_metrics"]["alice"]["score"], 1.0);
    assert_eq!(report["train_users"], 1);
    assert_eq!(report["test_users"], 1);
}

/// > The same seed reproduces the split
#[test]
fn merge_seed_is_reproducible() {
    let a = Project::empty();
    let b = Project::empty();
    merge_into(&a, &[]).success();
    merge_into(&b, &[]).success();
    assert_eq!(a.read("out/train.csv"), b.read("out/train.csv"));
}

/// > Config supplies output paths relative to the config file
#[test]
fn merge_uses_config_paths() {
    let project = Project::with_config(
        "version = 1\n[merge]\ntrain_path = \"split/train.csv\"\ntest_path = \"split/test.csv\"\nseed = 3\n",
    );
    let labeled = fixture("labeled");
    project.run(&["merge", labeled.to_str().unwrap()]).success();

    assert!(project.path().join("split/train.csv").exists());
    assert!(project.path().join("split/test.csv").exists());
}

/// > A missing directory is an internal error
#[test]
fn merge_missing_directory_exits_3() {
    let project = Project::empty();
    project
        .run(&["merge", "nope"])
        .code(3)
        .stderr(predicates::str::contains("failed to merge labels in nope"));
}
