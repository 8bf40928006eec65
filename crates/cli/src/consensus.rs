// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Merging labels from several labelers into consensus training data.
//!
//! Each transaction is labeled by several people. A labeler's vote is
//! weighted by their F1 score against the weighted majority, which is
//! refined over a few rounds starting from equal weights. Transactions
//! whose winning side gathers enough weight become consensus labels,
//! which are then split into train and test sets by user.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::config::MergeConfig;
use crate::error::{Error, Result};
use crate::metrics::LabelerMetrics;
use crate::transactions::{
    LABELED_COLUMNS, LabeledRow, Transaction, TransactionKey, read_raw_labeled_transactions,
    write_rows,
};

/// Label for a recurring transaction.
pub const RECURRING: &str = "1";
/// Label for a non-recurring transaction.
pub const NOT_RECURRING: &str = "0";

/// Votes for one transaction, keyed by labeler.
pub type Votes = BTreeMap<String, String>;

/// Labeler metrics keyed by labeler name.
pub type LabelerScores = BTreeMap<String, LabelerMetrics>;

/// Labeler name for a labeled file: the file name up to the first `.`,
/// then up to the first `-` (`alice-batch2.csv` is `alice`).
pub fn labeler_from_path(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name.split('.').next().unwrap_or_default();
    stem.split('-').next().unwrap_or_default().to_string()
}

/// List the CSV files of a directory in name order.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Votes gathered per unique transaction, in first-seen order.
#[derive(Debug, Default)]
pub struct VoteTable {
    entries: Vec<(Transaction, Votes)>,
    index: HashMap<TransactionKey, usize>,
}

impl VoteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `labeler`'s vote, replacing any earlier vote by the same labeler.
    pub fn add(&mut self, transaction: &Transaction, labeler: &str, label: &str) {
        let key = transaction.key();
        let ix = match self.index.get(&key) {
            Some(&ix) => ix,
            None => {
                self.entries.push((transaction.clone(), Votes::new()));
                self.index.insert(key, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        self.entries[ix]
            .1
            .insert(labeler.to_string(), label.to_string());
    }

    /// Keep only transactions with at least `min_votes` definite (`0`/`1`) votes.
    pub fn retain_decided(&mut self, min_votes: usize) {
        self.entries.retain(|(_, votes)| {
            votes
                .values()
                .filter(|v| *v == RECURRING || *v == NOT_RECURRING)
                .count()
                >= min_votes
        });
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(ix, (tx, _))| (tx.key(), ix))
            .collect();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Transaction, Votes)> {
        self.entries.iter()
    }
}

/// The label whose voters carry the most total score, and that score.
///
/// Ties go to "not recurring".
pub fn majority_vote(votes: &Votes, scores: &LabelerScores) -> (&'static str, f64) {
    let weight = |label: &str| -> f64 {
        votes
            .iter()
            .filter(|(_, vote)| vote.as_str() == label)
            .map(|(labeler, _)| scores.get(labeler).map_or(0.0, |m| m.score))
            .sum()
    };
    let not_recurring = weight(NOT_RECURRING);
    let recurring = weight(RECURRING);
    if recurring > not_recurring {
        (RECURRING, recurring)
    } else {
        (NOT_RECURRING, not_recurring)
    }
}

/// Measure every labeler against the weighted majority, repeating
/// `rounds` times so the weights settle.
pub fn score_labelers<'a>(
    table: &VoteTable,
    labelers: impl IntoIterator<Item = &'a str>,
    rounds: usize,
) -> LabelerScores {
    let mut scores: LabelerScores = labelers
        .into_iter()
        .map(|l| (l.to_string(), LabelerMetrics::default()))
        .collect();

    for round in 0..rounds {
        tracing::debug!("calculating labeler metrics: round {}", round);
        for metrics in scores.values_mut() {
            metrics.reset_counts();
        }

        // Majority votes are computed from the previous round's scores.
        let majorities: Vec<&'static str> = table
            .iter()
            .map(|(_, votes)| majority_vote(votes, &scores).0)
            .collect();

        for ((_, votes), majority) in table.iter().zip(majorities) {
            for (labeler, vote) in votes {
                let metrics = scores.entry(labeler.clone()).or_default();
                match (majority == RECURRING, vote.as_str() == majority) {
                    (true, true) => metrics.tp += 1,
                    (true, false) => metrics.fn_ += 1,
                    (false, true) => metrics.tn += 1,
                    (false, false) => metrics.fp += 1,
                }
            }
        }

        for metrics in scores.values_mut() {
            metrics.recompute();
        }
    }
    scores
}

/// One bucket of a histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram over the range of `values`; the last bin is
/// closed on the right. A constant series is centred in a unit range.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + width * i as f64,
            upper: lo + width * (i + 1) as f64,
            count: 0,
        })
        .collect();
    for v in values {
        let ix = (((v - lo) / width) as usize).min(bins - 1);
        out[ix].count += 1;
    }
    out
}

/// A transaction with its consensus label.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusLabel {
    pub transaction: Transaction,
    pub label: &'static str,
}

impl ConsensusLabel {
    pub fn row(&self) -> LabeledRow<'_> {
        LabeledRow {
            user_id: &self.transaction.user_id,
            name: &self.transaction.name,
            date: self.transaction.date,
            amount: self.transaction.amount,
            recurring: self.label,
        }
    }
}

/// Transactions whose majority vote carries at least `min_vote_threshold` weight.
pub fn consensus_labels(
    table: &VoteTable,
    scores: &LabelerScores,
    min_vote_threshold: f64,
) -> Vec<ConsensusLabel> {
    table
        .iter()
        .filter_map(|(tx, votes)| {
            let (label, score) = majority_vote(votes, scores);
            (score >= min_vote_threshold).then(|| ConsensusLabel {
                transaction: tx.clone(),
                label,
            })
        })
        .collect()
}

/// Train and test partitions, each sorted by `(user_id, name, date)`.
#[derive(Debug, Default)]
pub struct Split {
    pub train: Vec<ConsensusLabel>,
    pub test: Vec<ConsensusLabel>,
    pub train_users: usize,
    pub test_users: usize,
}

/// Put a random `floor(n_users * train_ratio)` users in train, the rest in test.
pub fn split_by_user<R: Rng + ?Sized>(
    labels: Vec<ConsensusLabel>,
    train_ratio: f64,
    rng: &mut R,
) -> Split {
    let users: BTreeSet<&str> = labels
        .iter()
        .map(|l| l.transaction.user_id.as_str())
        .collect();
    let mut users: Vec<String> = users.into_iter().map(String::from).collect();
    let n_train = (users.len() as f64 * train_ratio) as usize;
    users.shuffle(rng);
    let train_users: BTreeSet<String> = users.iter().take(n_train).cloned().collect();

    let (mut train, mut test): (Vec<_>, Vec<_>) = labels
        .into_iter()
        .partition(|l| train_users.contains(&l.transaction.user_id));

    let order = |a: &ConsensusLabel, b: &ConsensusLabel| {
        let (a, b) = (&a.transaction, &b.transaction);
        (&a.user_id, &a.name, a.date).cmp(&(&b.user_id, &b.name, b.date))
    };
    train.sort_by(order);
    test.sort_by(order);

    Split {
        train,
        test,
        train_users: n_train,
        test_users: users.len() - n_train,
    }
}

impl Split {
    /// Write both halves as `user_id,name,date,amount,recurring` files.
    pub fn write(&self, train_path: &Path, test_path: &Path) -> Result<()> {
        for (path, labels) in [(train_path, &self.train), (test_path, &self.test)] {
            let rows: Vec<LabeledRow> = labels.iter().map(ConsensusLabel::row).collect();
            write_rows(path, LABELED_COLUMNS, &rows)?;
            tracing::info!("wrote {} rows to {}", rows.len(), path.display());
        }
        Ok(())
    }
}

/// Summary of a merge run.
#[derive(Debug, Serialize)]
pub struct MergeReport {
    pub files: usize,
    pub transactions_read: usize,
    pub labelers: Vec<String>,
    pub unique_transactions: usize,
    pub decided_transactions: usize,
    pub labeler_metrics: LabelerScores,
    pub majority_score_histogram: Vec<HistogramBin>,
    pub min_vote_threshold: f64,
    pub consensus_transactions: usize,
    pub train_users: usize,
    pub test_users: usize,
    pub train_rows: usize,
    pub test_rows: usize,
}

impl MergeReport {
    /// Labelers ordered by descending score.
    pub fn ranked_labelers(&self) -> Vec<(&String, &LabelerMetrics)> {
        let mut ranked: Vec<_> = self.labeler_metrics.iter().collect();
        ranked.sort_by(|a, b| b.1.score.total_cmp(&a.1.score));
        ranked
    }
}

/// Result of merging a directory of labeled files.
#[derive(Debug)]
pub struct MergeOutcome {
    pub report: MergeReport,
    pub split: Split,
}

/// Read every labeled file in `dir` and build the consensus split.
pub fn merge_directory<R: Rng + ?Sized>(
    dir: &Path,
    config: &MergeConfig,
    rng: &mut R,
) -> Result<MergeOutcome> {
    let files = list_csv_files(dir)?;
    let mut table = VoteTable::new();
    let mut labelers = BTreeSet::new();
    let mut transactions_read = 0;

    for path in &files {
        let labeler = labeler_from_path(path);
        tracing::info!("reading {} (labeler {})", path.display(), labeler);
        let (txs, labels) = read_raw_labeled_transactions(path, false)?;
        tracing::info!("   read {} transactions", txs.len());
        transactions_read += txs.len();
        for (tx, label) in txs.iter().zip(&labels) {
            table.add(tx, &labeler, label);
        }
        labelers.insert(labeler);
    }
    tracing::info!(
        "read {} transactions from {} labelers",
        transactions_read,
        labelers.len()
    );

    let unique_transactions = table.len();
    table.retain_decided(config.min_votes);
    tracing::info!(
        "kept {} of {} transactions with at least {} definite votes",
        table.len(),
        unique_transactions,
        config.min_votes
    );

    let scores = score_labelers(&table, labelers.iter().map(String::as_str), config.rounds);

    let majority_scores: Vec<f64> = table
        .iter()
        .map(|(_, votes)| majority_vote(votes, &scores).1)
        .collect();
    let majority_score_histogram = histogram(&majority_scores, config.histogram_bins);

    let consensus = consensus_labels(&table, &scores, config.min_vote_threshold);
    let consensus_transactions = consensus.len();
    tracing::info!("consensus transactions: {}", consensus_transactions);

    let split = split_by_user(consensus, config.train_ratio, rng);
    tracing::info!(
        "train users: {}, test users: {}",
        split.train_users,
        split.test_users
    );

    let report = MergeReport {
        files: files.len(),
        transactions_read,
        labelers: labelers.into_iter().collect(),
        unique_transactions,
        decided_transactions: table.len(),
        labeler_metrics: scores,
        majority_score_histogram,
        min_vote_threshold: config.min_vote_threshold,
        consensus_transactions,
        train_users: split.train_users,
        test_users: split.test_users,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
    };
    Ok(MergeOutcome { report, split })
}

#[cfg(test)]
#[path = "consensus_tests.rs"]
mod tests;
