//! Shared unit test utilities.
//!
//! Provides common helpers for unit tests in the cli crate.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use tempfile::NamedTempFile;

use crate::transactions::{DATE_FORMAT, Transaction};

/// Build a transaction with id 0 from a `YYYY-MM-DD` date.
pub fn tx(user_id: &str, name: &str, date: &str, amount: f64) -> Transaction {
    Transaction {
        id: 0,
        user_id: user_id.to_string(),
        name: name.to_string(),
        date: NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
        amount,
    }
}

/// Build a same-vendor series for one user from `(date, amount)` pairs.
pub fn series(name: &str, points: &[(&str, f64)]) -> Vec<Transaction> {
    points
        .iter()
        .map(|(date, amount)| tx("u1", name, date, *amount))
        .collect()
}

/// Creates a directory tree from a list of (path, content) pairs.
///
/// Parent directories are created automatically.
pub fn create_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }
}

/// Creates a temp file with the given content for testing.
///
/// Returns the NamedTempFile which keeps the file alive.
pub fn temp_file_with_content(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

/// Creates a temp file with content using writeln! for each line.
///
/// Useful for CSV fixtures written row by row.
pub fn temp_file_with_lines(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}
