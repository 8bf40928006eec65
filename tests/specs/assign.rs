//! Behavioral specs for `recur-scan assign`.

use crate::prelude::*;

const SMALL: &str = "version = 1
[assign]
n_labelers = 2
n_repetitions = 1
n_accounts = 2
min_transactions_per_account = 2
max_transactions_per_account = 10
min_transactions_per_labeler = 2
max_transactions_per_labeler = 10
seed = 11
";

fn exports() -> (String, String) {
    (
        fixture("exports/plaid.csv").to_str().unwrap().to_string(),
        fixture("exports/internal.csv").to_str().unwrap().to_string(),
    )
}

/// > Each labeler gets a sorted file of their accounts' transactions
#[test]
fn assign_writes_labeler_files() {
    let project = Project::with_config(SMALL);
    let (plaid, internal) = exports();

    project
        .run(&["assign", "--plaid", &plaid, "--internal", &internal, "--color", "never"])
        .success()
        .stdout(predicates::str::contains("Combined 6 transactions from 3 users"))
        .stdout(predicates::str::contains("2 eligible users, selected 2 accounts with 5 transactions"));

    let first = project.read("data/to_label/labeler_0.csv");
    let second = project.read("data/to_label/labeler_1.csv");
    let both = format!("{first}{second}");
    assert!(first.starts_with("user_id,name,date,amount\n"));
    assert!(both.contains("u1,Netflix,2024-01-01,15.99\nu1,Netflix,2024-02-01,15.99\n"));
    assert!(both.contains("u2,Gym,2024-01-05,30.0\nu2,Gym,2024-02-05,30.0\nu2,Gym,2024-03-05,30.0\n"));
    assert!(!both.contains("u3"));
}

/// > --output-dir overrides the configured directory
#[test]
fn assign_output_dir_flag() {
    let project = Project::with_config(SMALL);
    let (plaid, internal) = exports();

    project
        .run(&["assign", "--plaid", &plaid, "--internal", &internal, "--output-dir", "batch"])
        .success();

    assert!(project.path().join("batch/labeler_0.csv").exists());
    assert!(project.path().join("batch/labeler_1.csv").exists());
}

/// > Too few eligible accounts fails with exit code 3
#[test]
fn assign_insufficient_accounts() {
    let project = Project::with_config(&SMALL.replace("n_accounts = 2", "n_accounts = 4"));
    let (plaid, internal) = exports();

    project
        .run(&["assign", "--plaid", &plaid, "--internal", &internal])
        .code(3)
        .stderr(predicates::str::contains("need 4 eligible accounts but only 2 are available"));
}

/// > An inconsistent assign config is a configuration error
#[test]
fn assign_rejects_uneven_accounts() {
    let project = Project::with_config(&SMALL.replace("n_accounts = 2", "n_accounts = 3"));
    let (plaid, internal) = exports();

    project
        .run(&["assign", "--plaid", &plaid, "--internal", &internal])
        .code(2)
        .stderr(predicates::str::contains("multiple of n_labelers"));
}
