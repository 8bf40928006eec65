//! Behavioral specs for `recur-scan features`.

use crate::prelude::*;

/// > Writes a header of id,user_id,name,date followed by the feature columns
#[test]
fn features_csv_to_stdout() {
    let assert = recur_scan_cmd()
        .args(["features"])
        .arg(fixture("transactions.csv"))
        .assert()
        .success();
    let stdout = stdout_of(&assert);

    let mut lines = stdout.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("id,user_id,name,date,n_transactions_same_amount,"));
    // One row per parseable transaction; the bad amount is skipped.
    assert_eq!(lines.count(), 8);
}

/// > Rows keep input order
#[test]
fn features_rows_follow_input_order() {
    let assert = recur_scan_cmd()
        .args(["features"])
        .arg(fixture("transactions.csv"))
        .assert()
        .success();
    let stdout = stdout_of(&assert);

    let ids: Vec<&str> = stdout
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(ids, vec!["0", "1", "2", "3", "4", "5", "6", "8"]);
}

/// > --labeled carries the recurring column after the date
#[test]
fn features_labeled_includes_recurring() {
    let assert = recur_scan_cmd()
        .args(["features", "--labeled"])
        .arg(fixture("transactions.csv"))
        .assert()
        .success();
    let stdout = stdout_of(&assert);

    assert!(stdout.starts_with("id,user_id,name,date,recurring,"));
    assert!(stdout.contains("\n0,u1,Netflix,2024-01-01,1,3,"));
}

/// > A skipped row is reported on stderr
#[test]
fn features_warns_on_bad_amount() {
    recur_scan_cmd()
        .args(["features"])
        .arg(fixture("transactions.csv"))
        .assert()
        .success()
        .stderr(predicates::str::contains("not-a-number"));
}

/// > -o writes JSON to a file
#[test]
fn features_json_to_file() {
    let project = Project::empty();
    let input = fixture("transactions.csv");

    project
        .run(&["features", input.to_str().unwrap(), "-o", "features.json", "--output", "json"])
        .success()
        .stdout(predicates::str::is_empty());

    let rows: serde_json::Value = serde_json::from_str(&project.read("features.json")).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 8);
    let verizon = rows.iter().find(|r| r["name"] == "Verizon Wireless").unwrap();
    assert_eq!(verizon["is_phone"], true);
    let insurance = rows.iter().find(|r| r["name"] == "State Farm Insurance").unwrap();
    assert_eq!(insurance["is_insurance"], true);
}

/// > A missing input file is an internal error
#[test]
fn features_missing_input_exits_3() {
    let project = Project::empty();
    project
        .run(&["features", "missing.csv"])
        .code(3)
        .stderr(predicates::str::contains("missing.csv"));
}
