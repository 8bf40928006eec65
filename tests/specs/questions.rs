//! Behavioral specs for `recur-scan questions`.

use crate::prelude::*;

const HEADER: &str = "user_id,name,date,amount,recurring\n";

/// > Questioned series are written to <output-dir>/<date>.csv
#[test]
fn questions_writes_dated_file() {
    let project = Project::empty();
    project.file(
        "labeled/alice.csv",
        &format!("{HEADER}u1,Adobe,2024-01-01,52.99,?\nu1,Adobe,2024-02-01,52.99,1\nu1,Gym,2024-01-05,30.00,0\n"),
    );
    project.file(
        "labeled/bob.csv",
        &format!("{HEADER}u2,Adobe,2024-01-03,52.99,?\nu3,Hulu,2024-01-09,7.99,?\n"),
    );

    project
        .run(&["questions", "labeled", "--output-dir", "out", "--date", "2024-05-17", "--color", "never"])
        .success()
        .stdout(predicates::str::contains("3 questioned series, 2 vendors, 3 rows written to"));

    let written = project.read("out/2024-05-17.csv");
    assert_eq!(
        written,
        format!("{HEADER}u1,Adobe,2024-01-01,52.99,?\nu1,Adobe,2024-02-01,52.99,1\nu3,Hulu,2024-01-09,7.99,?\n")
    );
}

/// > Default output directory comes from config
#[test]
fn questions_default_output_dir() {
    let project = Project::empty();
    project.file(
        "labeled/alice.csv",
        &format!("{HEADER}u1,Adobe,2024-01-01,52.99,?\n"),
    );

    project
        .run(&["questions", "labeled", "--date", "2024-01-02"])
        .success();

    assert!(project.path().join("data/questions/2024-01-02.csv").exists());
}

/// > An invalid --date is a usage error
#[test]
fn questions_rejects_bad_date() {
    let project = Project::empty();
    project
        .run(&["questions", "labeled", "--date", "17/05/2024"])
        .code(2);
}
