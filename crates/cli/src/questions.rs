// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Gathering uncertain labels for review.
//!
//! Labelers mark transactions they are unsure about with `?`. Every
//! `(user_id, name)` series containing such a mark is collected so the
//! vendor can be discussed once and the answer applied everywhere.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::consensus::list_csv_files;
use crate::error::Result;
use crate::transactions::{
    LABELED_COLUMNS, LabeledRow, Transaction, read_trimmed_labeled_transactions, write_rows,
};

/// Label a labeler uses when unsure.
pub const QUESTION: &str = "?";

/// A vendor series containing at least one question mark.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionGroup {
    pub user_id: String,
    pub name: String,
    pub rows: Vec<(Transaction, String)>,
}

/// Question groups across files, in first-seen order.
#[derive(Debug, Default)]
pub struct Questions {
    groups: Vec<QuestionGroup>,
    index: HashMap<(String, String), usize>,
}

impl Questions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the questioned series of one file. A series already collected
    /// from an earlier file is replaced in place.
    ///
    /// Returns the number of questioned series in this file.
    pub fn add_file(&mut self, transactions: Vec<Transaction>, labels: Vec<String>) -> usize {
        let mut file_groups: Vec<QuestionGroup> = Vec::new();
        let mut file_index: HashMap<(String, String), usize> = HashMap::new();

        for (tx, label) in transactions.into_iter().zip(labels) {
            let key = (tx.user_id.clone(), tx.name.clone());
            let ix = *file_index.entry(key).or_insert_with(|| {
                file_groups.push(QuestionGroup {
                    user_id: tx.user_id.clone(),
                    name: tx.name.clone(),
                    rows: Vec::new(),
                });
                file_groups.len() - 1
            });
            file_groups[ix].rows.push((tx, label));
        }

        let mut found = 0;
        for group in file_groups {
            if !group.rows.iter().any(|(_, label)| label == QUESTION) {
                continue;
            }
            found += 1;
            let key = (group.user_id.clone(), group.name.clone());
            match self.index.get(&key) {
                Some(&ix) => self.groups[ix] = group,
                None => {
                    self.index.insert(key, self.groups.len());
                    self.groups.push(group);
                }
            }
        }
        found
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total rows across all groups.
    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|g| g.rows.len()).sum()
    }

    /// Output rows, keeping only the first series seen for each vendor name.
    pub fn unique_vendor_rows(&self) -> Vec<LabeledRow<'_>> {
        let mut seen_names: HashSet<&str> = HashSet::new();
        self.groups
            .iter()
            .filter(|g| seen_names.insert(&g.name))
            .flat_map(|g| {
                g.rows.iter().map(|(tx, label)| LabeledRow {
                    user_id: &tx.user_id,
                    name: &tx.name,
                    date: tx.date,
                    amount: tx.amount,
                    recurring: label,
                })
            })
            .collect()
    }
}

/// Collect questioned series from every CSV file in `dir`.
pub fn gather_questions(dir: &Path) -> Result<Questions> {
    let files = list_csv_files(dir)?;
    tracing::info!("found {} files in {}", files.len(), dir.display());

    let mut questions = Questions::new();
    for path in &files {
        tracing::info!("processing {}", path.display());
        let (txs, labels) = read_trimmed_labeled_transactions(path, true)?;
        let found = questions.add_file(txs, labels);
        tracing::info!("found {} questioned series in {}", found, path.display());
    }
    tracing::info!(
        "collected {} series with {} labels",
        questions.len(),
        questions.row_count()
    );
    Ok(questions)
}

/// Output file for questions gathered on `date`.
pub fn questions_path(output_dir: &Path, date: NaiveDate) -> PathBuf {
    output_dir.join(format!("{}.csv", date.format("%Y-%m-%d")))
}

/// Summary of a questions run.
#[derive(Debug, Serialize)]
pub struct QuestionsReport {
    pub series: usize,
    pub vendors: usize,
    pub rows: usize,
    pub output: PathBuf,
}

/// Write one row set per vendor to `path`.
pub fn write_questions(questions: &Questions, path: &Path) -> Result<QuestionsReport> {
    let rows = questions.unique_vendor_rows();
    let vendors: HashSet<&str> = rows.iter().map(|r| r.name).collect();
    write_rows(path, LABELED_COLUMNS, &rows)?;
    tracing::info!("wrote {} rows to {}", rows.len(), path.display());
    Ok(QuestionsReport {
        series: questions.len(),
        vendors: vendors.len(),
        rows: rows.len(),
        output: path.to_path_buf(),
    })
}

#[cfg(test)]
#[path = "questions_tests.rs"]
mod tests;
