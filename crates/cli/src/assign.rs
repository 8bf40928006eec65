// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Distributing accounts to human labelers.
//!
//! Raw exports are merged, eligible accounts sampled, and each account
//! handed to `n_repetitions` labelers so their votes can later be merged
//! into a consensus label. The assignment is retried at random until every
//! labeler's workload falls inside the configured bounds.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::config::AssignConfig;
use crate::error::{Error, Result};
use crate::transactions::{Transaction, UNLABELED_COLUMNS, write_rows};

pub const USER_ID_COLUMN: &str = "user_id";
pub const NAME_COLUMN: &str = "merchant_name";
pub const DATE_COLUMN: &str = "transaction_timestamp";
pub const AMOUNT_COLUMN: &str = "transaction_amount";

/// Timestamp layouts carrying an explicit offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Timestamp layouts without an offset, read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.fZ",
];

/// Parse a timestamp in any supported layout to its UTC calendar date.
pub fn parse_timestamp(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.with_timezone(&Utc).date_naive());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Read one export, keeping rows where every required cell is present.
///
/// Empty-cell counts are logged for every column of the file.
pub fn read_export(path: &Path) -> Result<Vec<Transaction>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| Error::csv(path, e))?;
    let headers = reader.headers().map_err(|e| Error::csv(path, e))?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| Error::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };
    let user_ix = column(USER_ID_COLUMN)?;
    let name_ix = column(NAME_COLUMN)?;
    let date_ix = column(DATE_COLUMN)?;
    let amount_ix = column(AMOUNT_COLUMN)?;

    let mut empty_cells = vec![0usize; headers.len()];
    let mut rows = 0usize;
    let mut dropped = 0usize;
    let mut transactions = Vec::new();

    for (ix, record) in reader.records().enumerate() {
        let record = record.map_err(|e| Error::csv(path, e))?;
        rows += 1;
        for (col, count) in empty_cells.iter_mut().enumerate() {
            if record.get(col).is_none_or(|cell| cell.trim().is_empty()) {
                *count += 1;
            }
        }

        let cell = |col: usize| record.get(col).map(str::trim).filter(|c| !c.is_empty());
        let (Some(user_id), Some(name), Some(date), Some(amount)) =
            (cell(user_ix), cell(name_ix), cell(date_ix), cell(amount_ix))
        else {
            dropped += 1;
            continue;
        };

        let date = parse_timestamp(date).ok_or_else(|| Error::InvalidDate {
            path: path.to_path_buf(),
            row: ix,
            value: date.to_string(),
        })?;
        let amount = match amount.parse::<f64>() {
            Ok(amount) => amount,
            Err(e) => {
                tracing::warn!(
                    "skipping transaction amount {:?} in {} at row {}: {}",
                    amount,
                    path.display(),
                    ix,
                    e
                );
                dropped += 1;
                continue;
            }
        };

        transactions.push(Transaction {
            id: ix,
            user_id: user_id.to_string(),
            name: name.to_string(),
            date,
            amount,
        });
    }

    tracing::info!("loaded {} transactions from {}", rows, path.display());
    for (header, count) in headers.iter().zip(&empty_cells) {
        tracing::info!("{}: {} empty cells", header, count);
    }
    tracing::info!(
        "dropped {} rows with missing values, {} remaining",
        dropped,
        transactions.len()
    );
    Ok(transactions)
}

/// Transactions per user.
pub fn count_per_user(transactions: &[Transaction]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for tx in transactions {
        *counts.entry(tx.user_id.clone()).or_insert(0) += 1;
    }
    counts
}

/// Users whose transaction count lies within `min..=max`.
pub fn eligible_users(counts: &BTreeMap<String, usize>, min: usize, max: usize) -> Vec<String> {
    counts
        .iter()
        .filter(|(_, n)| (min..=max).contains(*n))
        .map(|(user, _)| user.clone())
        .collect()
}

/// Pick `n` distinct users at random.
pub fn select_accounts<R: Rng + ?Sized>(
    users: &[String],
    n: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    if users.len() < n {
        return Err(Error::InsufficientAccounts {
            needed: n,
            available: users.len(),
        });
    }
    let mut users = users.to_vec();
    users.shuffle(rng);
    users.truncate(n);
    Ok(users)
}

/// Accounts handed to each labeler, indexed by labeler number.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub labelers: Vec<Vec<String>>,
}

impl Assignment {
    /// Transactions each labeler must label.
    pub fn totals(&self, counts: &BTreeMap<String, usize>) -> Vec<usize> {
        self.labelers
            .iter()
            .map(|users| users.iter().map(|u| counts.get(u).copied().unwrap_or(0)).sum())
            .collect()
    }
}

/// One random assignment, as indices into `users`.
///
/// Each labeler is filled first from users with no labeler yet, then from
/// users with one, and so on.
fn draw_assignment<R: Rng + ?Sized>(
    n_users: usize,
    config: &AssignConfig,
    rng: &mut R,
) -> (Vec<Vec<usize>>, Vec<usize>) {
    let per_labeler = config.accounts_per_labeler();
    let mut assigned = vec![0usize; n_users];
    let mut labelers = Vec::with_capacity(config.n_labelers);

    for _ in 0..config.n_labelers {
        let mut picked: Vec<usize> = Vec::with_capacity(per_labeler);
        for repetition in 0..config.n_repetitions {
            let mut available: Vec<usize> =
                (0..n_users).filter(|&u| assigned[u] == repetition).collect();
            available.shuffle(rng);
            let take = (per_labeler - picked.len()).min(available.len());
            picked.extend_from_slice(&available[..take]);
            if picked.len() == per_labeler {
                break;
            }
        }
        for &u in &picked {
            assigned[u] += 1;
        }
        labelers.push(picked);
    }
    (labelers, assigned)
}

fn satisfies(
    labelers: &[Vec<usize>],
    assigned: &[usize],
    user_counts: &[usize],
    config: &AssignConfig,
) -> bool {
    let bounds = config.min_transactions_per_labeler..=config.max_transactions_per_labeler;
    for (labeler, users) in labelers.iter().enumerate() {
        let total: usize = users.iter().map(|&u| user_counts[u]).sum();
        if !bounds.contains(&total) {
            tracing::debug!("labeler {} has {} transactions", labeler, total);
            return false;
        }
    }
    if let Some(u) = assigned.iter().position(|&n| n != config.n_repetitions) {
        tracing::debug!("user {} is assigned to {} labelers", u, assigned[u]);
        return false;
    }
    let per_labeler = config.accounts_per_labeler();
    if let Some(labeler) = labelers.iter().position(|users| users.len() != per_labeler) {
        tracing::debug!(
            "labeler {} has {} accounts",
            labeler,
            labelers[labeler].len()
        );
        return false;
    }
    true
}

/// Assign `users` to labelers, retrying until every constraint holds.
pub fn assign_labelers<R: Rng + ?Sized>(
    users: &[String],
    counts: &BTreeMap<String, usize>,
    config: &AssignConfig,
    rng: &mut R,
) -> Result<Assignment> {
    let user_counts: Vec<usize> = users
        .iter()
        .map(|u| counts.get(u).copied().unwrap_or(0))
        .collect();

    for attempt in 1..=config.max_attempts {
        let (labelers, assigned) = draw_assignment(users.len(), config, rng);
        if satisfies(&labelers, &assigned, &user_counts, config) {
            tracing::info!("constraints satisfied after {} attempts", attempt);
            let labelers = labelers
                .into_iter()
                .map(|ixs| ixs.into_iter().map(|u| users[u].clone()).collect())
                .collect();
            return Ok(Assignment { labelers });
        }
    }
    Err(Error::AssignmentFailed {
        attempts: config.max_attempts,
    })
}

/// Output row for files handed to labelers.
#[derive(Serialize)]
struct UnlabeledRow<'a> {
    user_id: &'a str,
    name: &'a str,
    date: NaiveDate,
    amount: f64,
}

/// Write `labeler_<i>.csv` for every labeler, sorted by user, name, date, amount.
pub fn write_assignments(
    output_dir: &Path,
    assignment: &Assignment,
    transactions: &[Transaction],
) -> Result<Vec<PathBuf>> {
    let mut by_user: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
    for tx in transactions {
        by_user.entry(&tx.user_id).or_default().push(tx);
    }
    for txs in by_user.values_mut() {
        txs.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then(a.date.cmp(&b.date))
                .then(a.amount.total_cmp(&b.amount))
        });
    }

    let mut paths = Vec::with_capacity(assignment.labelers.len());
    for (labeler, users) in assignment.labelers.iter().enumerate() {
        let mut users: Vec<&str> = users.iter().map(String::as_str).collect();
        users.sort_unstable();
        let rows: Vec<UnlabeledRow> = users
            .iter()
            .filter_map(|u| by_user.get(u))
            .flatten()
            .map(|tx| UnlabeledRow {
                user_id: &tx.user_id,
                name: &tx.name,
                date: tx.date,
                amount: tx.amount,
            })
            .collect();
        let path = output_dir.join(format!("labeler_{labeler}.csv"));
        write_rows(&path, UNLABELED_COLUMNS, &rows)?;
        tracing::debug!("wrote {} rows to {}", rows.len(), path.display());
        paths.push(path);
    }
    Ok(paths)
}

/// Summary of a completed assignment.
#[derive(Debug, Serialize)]
pub struct AssignReport {
    pub transactions: usize,
    pub users: usize,
    pub eligible_users: usize,
    pub selected_users: usize,
    pub selected_transactions: usize,
    /// Transactions per labeler, by labeler number.
    pub labeler_totals: Vec<usize>,
    pub files: Vec<PathBuf>,
}

/// Build labeling files from a Plaid export and an internal export.
pub fn create_training_data<R: Rng + ?Sized>(
    plaid: &Path,
    internal: &Path,
    config: &AssignConfig,
    rng: &mut R,
) -> Result<AssignReport> {
    let mut transactions = read_export(plaid)?;
    transactions.extend(read_export(internal)?);
    tracing::info!("combined dataset contains {} transactions", transactions.len());

    let counts = count_per_user(&transactions);
    let eligible = eligible_users(
        &counts,
        config.min_transactions_per_account,
        config.max_transactions_per_account,
    );
    tracing::info!(
        "{} of {} users have {}..={} transactions",
        eligible.len(),
        counts.len(),
        config.min_transactions_per_account,
        config.max_transactions_per_account
    );

    let selected = select_accounts(&eligible, config.n_accounts, rng)?;
    let selected_transactions: usize = selected
        .iter()
        .map(|u| counts.get(u).copied().unwrap_or(0))
        .sum();
    tracing::info!(
        "selected {} accounts with {} transactions",
        selected.len(),
        selected_transactions
    );

    let assignment = assign_labelers(&selected, &counts, config, rng)?;
    let labeler_totals = assignment.totals(&counts);
    for (labeler, total) in labeler_totals.iter().enumerate() {
        tracing::debug!("labeler {} has {} transactions", labeler, total);
    }

    let files = write_assignments(&config.output_dir, &assignment, &transactions)?;

    Ok(AssignReport {
        transactions: transactions.len(),
        users: counts.len(),
        eligible_users: eligible.len(),
        selected_users: selected.len(),
        selected_transactions,
        labeler_totals,
        files,
    })
}

#[cfg(test)]
#[path = "assign_tests.rs"]
mod tests;
