// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transaction records and their CSV representation.
//!
//! Input files carry `user_id,name,date,amount` and optionally a
//! `recurring` label column. Rows whose amount or date cannot be parsed
//! are skipped with a warning so one bad export line does not sink a
//! whole labeling batch.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Date format used in every transaction file.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Header of unlabeled transaction files.
pub const UNLABELED_COLUMNS: &[&str] = &["user_id", "name", "date", "amount"];

/// Header of labeled transaction files.
pub const LABELED_COLUMNS: &[&str] = &["user_id", "name", "date", "amount", "recurring"];

/// Header of labeled files that keep the source row id.
pub const ID_LABELED_COLUMNS: &[&str] = &["id", "user_id", "name", "date", "amount", "recurring"];

/// A single bank transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// Row index in the source file, or 0 when ids are not assigned.
    pub id: usize,
    pub user_id: String,
    /// Vendor name.
    pub name: String,
    pub date: NaiveDate,
    pub amount: f64,
}

/// Hashable identity of a transaction, ignoring its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionKey {
    pub user_id: String,
    pub name: String,
    pub date: NaiveDate,
    amount_bits: u64,
}

impl Transaction {
    /// Identity used to merge the same transaction seen in several files.
    pub fn key(&self) -> TransactionKey {
        TransactionKey {
            user_id: self.user_id.clone(),
            name: self.name.clone(),
            date: self.date,
            amount_bits: self.amount.to_bits(),
        }
    }
}

/// Transactions grouped by `(user_id, name)`, in key order.
pub type GroupedTransactions = BTreeMap<(String, String), Vec<Transaction>>;

/// A row as it appears on disk, before validation.
#[derive(Debug, Deserialize)]
struct RawRow {
    user_id: String,
    name: String,
    date: String,
    amount: String,
    #[serde(default)]
    recurring: Option<String>,
}

/// Output row for labeled transaction files without ids.
#[derive(Debug, Serialize)]
pub struct LabeledRow<'a> {
    pub user_id: &'a str,
    pub name: &'a str,
    pub date: NaiveDate,
    pub amount: f64,
    pub recurring: &'a str,
}

#[derive(Serialize)]
struct IdLabeledRow<'a> {
    id: usize,
    user_id: &'a str,
    name: &'a str,
    date: NaiveDate,
    amount: f64,
    recurring: &'a str,
}

/// Parse every valid row of `path`, returning transactions and raw (trimmed) labels.
fn parse_transactions(path: &Path, set_id: bool) -> Result<(Vec<Transaction>, Vec<String>)> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| Error::csv(path, e))?;
    let mut transactions = Vec::new();
    let mut labels = Vec::new();

    for (ix, row) in reader.deserialize::<RawRow>().enumerate() {
        let row = row.map_err(|e| Error::csv(path, e))?;

        let amount = match row.amount.trim().parse::<f64>() {
            Ok(amount) => amount,
            Err(e) => {
                tracing::warn!(
                    "skipping transaction amount {:?} in {} at row {}: {}",
                    row.amount,
                    path.display(),
                    ix,
                    e
                );
                continue;
            }
        };
        let date = match NaiveDate::parse_from_str(row.date.trim(), DATE_FORMAT) {
            Ok(date) => date,
            Err(e) => {
                tracing::warn!(
                    "skipping transaction date {:?} in {} at row {}: {}",
                    row.date,
                    path.display(),
                    ix,
                    e
                );
                continue;
            }
        };

        transactions.push(Transaction {
            id: if set_id { ix } else { 0 },
            user_id: row.user_id,
            name: row.name,
            date,
            amount,
        });
        labels.push(row.recurring.unwrap_or_default().trim().to_string());
    }

    tracing::debug!("read {} transactions from {}", transactions.len(), path.display());
    Ok((transactions, labels))
}

/// Read transactions with labels converted to booleans (`"1"` is recurring).
pub fn read_labeled_transactions(path: &Path) -> Result<(Vec<Transaction>, Vec<bool>)> {
    let (transactions, labels) = parse_transactions(path, true)?;
    let labels = labels.iter().map(|l| l == "1").collect();
    Ok((transactions, labels))
}

/// Read transactions keeping labels verbatim; an empty label reads as `"0"`.
///
/// With `set_id = false` every id is 0, so identical transactions from
/// different labelers compare equal.
pub fn read_raw_labeled_transactions(
    path: &Path,
    set_id: bool,
) -> Result<(Vec<Transaction>, Vec<String>)> {
    let (transactions, labels) = parse_transactions(path, set_id)?;
    let labels = labels
        .into_iter()
        .map(|l| if l.is_empty() { "0".to_string() } else { l })
        .collect();
    Ok((transactions, labels))
}

/// Read transactions with trimmed labels exactly as written; a blank label
/// stays blank.
pub fn read_trimmed_labeled_transactions(
    path: &Path,
    set_id: bool,
) -> Result<(Vec<Transaction>, Vec<String>)> {
    parse_transactions(path, set_id)
}

/// Read transactions, ignoring any label column.
pub fn read_unlabeled_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let (transactions, _) = parse_transactions(path, true)?;
    Ok(transactions)
}

/// Group transactions by `(user_id, name)`.
pub fn group_transactions(transactions: &[Transaction]) -> GroupedTransactions {
    let mut grouped = GroupedTransactions::new();
    for tx in transactions {
        grouped
            .entry((tx.user_id.clone(), tx.name.clone()))
            .or_default()
            .push(tx.clone());
    }
    grouped
}

/// Write transactions with their label looked up by transaction id.
pub fn write_transactions<L: AsRef<str>>(
    path: &Path,
    transactions: &[Transaction],
    labels: &[L],
) -> Result<()> {
    let mut rows = Vec::with_capacity(transactions.len());
    for tx in transactions {
        let label = labels
            .get(tx.id)
            .ok_or(Error::MissingLabel { id: tx.id })?;
        rows.push(IdLabeledRow {
            id: tx.id,
            user_id: &tx.user_id,
            name: &tx.name,
            date: tx.date,
            amount: tx.amount,
            recurring: label.as_ref(),
        });
    }
    write_rows(path, ID_LABELED_COLUMNS, &rows)
}

/// Serialize rows to a CSV file under `columns`.
///
/// The header is written even when `rows` is empty. `columns` must match the
/// field order of `T`.
pub fn write_rows<T: Serialize>(path: &Path, columns: &[&str], rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| Error::csv(path, e))?;
    writer
        .write_record(columns)
        .map_err(|e| Error::csv(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| Error::csv(path, e))?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}

#[cfg(test)]
#[path = "transactions_tests.rs"]
mod tests;
