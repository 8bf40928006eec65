// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-transaction features for recurring-transaction detection.
//!
//! Every feature compares one transaction against "all transactions",
//! which in practice is the transaction's own `(user_id, name)` group.
//! Each public function here must have a matching unit test; the
//! `check-features` command enforces that in CI.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::Datelike;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;

use crate::transactions::{GroupedTransactions, Transaction};

/// Vendors whose charges are recurring by nature.
const ALWAYS_RECURRING_VENDORS: &[&str] = &["google storage", "netflix", "hulu", "spotify"];

/// Default minimum vendor transactions before a sequence is considered.
pub const DEFAULT_MIN_OCCURRENCES: usize = 3;

/// Relative amount difference below which two charges count as the same.
const SEQUENCE_AMOUNT_TOLERANCE: f64 = 0.05;

#[allow(clippy::expect_used)]
static INSURANCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(insurance|insur|insuranc)\b").expect("valid regex pattern")
});

#[allow(clippy::expect_used)]
static UTILITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(utility|utilit|energy)\b").expect("valid regex pattern")
});

#[allow(clippy::expect_used)]
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(at&t|t-mobile|verizon)\b").expect("valid regex pattern")
});

/// Cadence detected by [`detect_sequence_patterns`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SequencePattern {
    Weekly,
    Monthly,
    Yearly,
}

impl SequencePattern {
    const ALL: [SequencePattern; 3] = [
        SequencePattern::Weekly,
        SequencePattern::Monthly,
        SequencePattern::Yearly,
    ];

    /// Nominal interval in days.
    pub fn expected_interval(self) -> f64 {
        match self {
            SequencePattern::Weekly => 7.0,
            SequencePattern::Monthly => 30.0,
            SequencePattern::Yearly => 365.0,
        }
    }
}

/// Result of sequence detection for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SequenceFeatures {
    /// Confidence in `[0, 1]` that the vendor charges follow `pattern`.
    pub confidence: f64,
    pub pattern: Option<SequencePattern>,
    /// Number of matching vendor transactions.
    pub length: usize,
}

impl SequenceFeatures {
    fn none() -> Self {
        Self {
            confidence: 0.0,
            pattern: None,
            length: 0,
        }
    }
}

/// The full feature record for one transaction, in output column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Features {
    pub n_transactions_same_amount: usize,
    pub percent_transactions_same_amount: f64,
    pub ends_in_99: bool,
    pub amount: f64,
    pub same_day_exact: usize,
    pub pct_transactions_same_day: f64,
    pub same_day_off_by_1: usize,
    pub same_day_off_by_2: usize,
    #[serde(rename = "14_days_apart_exact")]
    pub days_apart_14_exact: usize,
    #[serde(rename = "pct_14_days_apart_exact")]
    pub pct_days_apart_14_exact: f64,
    #[serde(rename = "14_days_apart_off_by_1")]
    pub days_apart_14_off_by_1: usize,
    #[serde(rename = "pct_14_days_apart_off_by_1")]
    pub pct_days_apart_14_off_by_1: f64,
    #[serde(rename = "7_days_apart_exact")]
    pub days_apart_7_exact: usize,
    #[serde(rename = "pct_7_days_apart_exact")]
    pub pct_days_apart_7_exact: f64,
    #[serde(rename = "7_days_apart_off_by_1")]
    pub days_apart_7_off_by_1: usize,
    #[serde(rename = "pct_7_days_apart_off_by_1")]
    pub pct_days_apart_7_off_by_1: f64,
    pub is_insurance: bool,
    pub is_utility: bool,
    pub is_phone: bool,
    pub is_always_recurring: bool,
    pub is_recurring: bool,
    pub recurring_transaction_confidence: f64,
    pub sequence_confidence: f64,
    pub is_sequence_weekly: f64,
    pub is_sequence_monthly: f64,
    pub sequence_length: usize,
}

/// Column names of [`Features`], matching its serialized field names.
pub const FEATURE_NAMES: [&str; 26] = [
    "n_transactions_same_amount",
    "percent_transactions_same_amount",
    "ends_in_99",
    "amount",
    "same_day_exact",
    "pct_transactions_same_day",
    "same_day_off_by_1",
    "same_day_off_by_2",
    "14_days_apart_exact",
    "pct_14_days_apart_exact",
    "14_days_apart_off_by_1",
    "pct_14_days_apart_off_by_1",
    "7_days_apart_exact",
    "pct_7_days_apart_exact",
    "7_days_apart_off_by_1",
    "pct_7_days_apart_off_by_1",
    "is_insurance",
    "is_utility",
    "is_phone",
    "is_always_recurring",
    "is_recurring",
    "recurring_transaction_confidence",
    "sequence_confidence",
    "is_sequence_weekly",
    "is_sequence_monthly",
    "sequence_length",
];

fn days_between(a: &Transaction, b: &Transaction) -> i64 {
    (a.date - b.date).num_days()
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; callers guarantee at least two values.
fn sample_stdev(values: &[f64]) -> f64 {
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Detect a weekly, monthly or yearly cadence among charges from the
/// same vendor with (nearly) the same amount.
pub fn detect_sequence_patterns(
    transaction: &Transaction,
    all_transactions: &[Transaction],
    min_occurrences: usize,
) -> SequenceFeatures {
    if transaction.amount == 0.0 {
        return SequenceFeatures::none();
    }

    let name = transaction.name.to_lowercase();
    let mut vendor_txs: Vec<&Transaction> = all_transactions
        .iter()
        .filter(|t| {
            t.name.to_lowercase() == name
                && ((t.amount - transaction.amount).abs() / transaction.amount.abs())
                    < SEQUENCE_AMOUNT_TOLERANCE
        })
        .collect();

    if vendor_txs.len() < min_occurrences || vendor_txs.len() < 2 {
        return SequenceFeatures::none();
    }

    vendor_txs.sort_by_key(|t| t.date);
    let intervals: Vec<f64> = vendor_txs
        .windows(2)
        .map(|w| days_between(w[1], w[0]) as f64)
        .collect();
    let avg_interval = mean(&intervals);
    let stdev_interval = if intervals.len() > 1 {
        sample_stdev(&intervals)
    } else {
        0.0
    };

    let mut best = SequenceFeatures {
        confidence: 0.0,
        pattern: None,
        length: vendor_txs.len(),
    };
    for pattern in SequencePattern::ALL {
        let expected = pattern.expected_interval();
        let tolerance = f64::max(2.0, expected * 0.1);
        if (avg_interval - expected).abs() <= tolerance {
            let confidence = 1.0 - stdev_interval / (expected + 1e-6);
            if confidence > best.confidence {
                best.pattern = Some(pattern);
                best.confidence = confidence.clamp(0.0, 1.0);
            }
        }
    }
    best
}

/// True when the vendor is known to bill on a schedule.
pub fn is_always_recurring(transaction: &Transaction) -> bool {
    ALWAYS_RECURRING_VENDORS.contains(&transaction.name.to_lowercase().as_str())
}

/// True when the vendor name looks like an insurance payment.
pub fn is_insurance(transaction: &Transaction) -> bool {
    INSURANCE_PATTERN.is_match(&transaction.name)
}

/// True when the vendor name looks like a utility payment.
pub fn is_utility(transaction: &Transaction) -> bool {
    UTILITY_PATTERN.is_match(&transaction.name)
}

/// True when the vendor name is a phone carrier.
pub fn is_phone(transaction: &Transaction) -> bool {
    PHONE_PATTERN.is_match(&transaction.name)
}

/// Count transactions within `n_days_off` days of a multiple of
/// `n_days_apart` days away from `transaction`.
pub fn n_transactions_days_apart(
    transaction: &Transaction,
    all_transactions: &[Transaction],
    n_days_apart: u32,
    n_days_off: u32,
) -> usize {
    if n_days_apart == 0 {
        return 0;
    }
    let apart = i64::from(n_days_apart);
    let off = i64::from(n_days_off);
    let lower_remainder = apart - off;

    all_transactions
        .iter()
        .filter(|t| {
            let days_diff = days_between(t, transaction).abs();
            if days_diff < lower_remainder {
                return false;
            }
            let remainder = days_diff % apart;
            remainder <= off || remainder >= lower_remainder
        })
        .count()
}

/// [`n_transactions_days_apart`] as a fraction of `all_transactions`.
pub fn pct_transactions_days_apart(
    transaction: &Transaction,
    all_transactions: &[Transaction],
    n_days_apart: u32,
    n_days_off: u32,
) -> f64 {
    ratio(
        n_transactions_days_apart(transaction, all_transactions, n_days_apart, n_days_off),
        all_transactions.len(),
    )
}

/// Count transactions on (nearly) the same day of the month.
pub fn n_transactions_same_day(
    transaction: &Transaction,
    all_transactions: &[Transaction],
    n_days_off: u32,
) -> usize {
    let day = transaction.date.day();
    all_transactions
        .iter()
        .filter(|t| t.date.day().abs_diff(day) <= n_days_off)
        .count()
}

/// [`n_transactions_same_day`] as a fraction of `all_transactions`.
pub fn pct_transactions_same_day(
    transaction: &Transaction,
    all_transactions: &[Transaction],
    n_days_off: u32,
) -> f64 {
    ratio(
        n_transactions_same_day(transaction, all_transactions, n_days_off),
        all_transactions.len(),
    )
}

/// True when the amount's cents are 99 (e.g. 9.99, -19.99).
pub fn ends_in_99(transaction: &Transaction) -> bool {
    let cents = (transaction.amount.abs() * 100.0).round() as i64;
    cents % 100 == 99
}

/// True when another charge with the same name and amount lies a whole
/// number of weeks, fortnights or 30-day months away.
pub fn is_recurring(transaction: &Transaction, all_transactions: &[Transaction]) -> bool {
    all_transactions
        .iter()
        .filter(|t| {
            t.amount == transaction.amount
                && t.name == transaction.name
                && t.date != transaction.date
        })
        .map(|t| days_between(transaction, t).abs())
        .any(|interval| interval % 7 == 0 || interval % 14 == 0 || interval % 30 == 0)
}

fn jaccard_similarity(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Weighted confidence that `transaction` recurs, combining amount
/// stability (30%), interval regularity (30%), 30-day frequency (20%)
/// and name similarity (20%) over same-name charges on other dates.
pub fn recurring_transaction_confidence(
    transaction: &Transaction,
    all_transactions: &[Transaction],
) -> f64 {
    let others: Vec<&Transaction> = all_transactions
        .iter()
        .filter(|t| t.name == transaction.name && t.date != transaction.date)
        .collect();

    let amounts: Vec<f64> = others.iter().map(|t| t.amount).collect();
    let amount_stability = if amounts.len() < 2 {
        1.0
    } else {
        let m = mean(&amounts);
        if m == 0.0 {
            1.0
        } else {
            sample_stdev(&amounts) / m.abs()
        }
    };

    let mut dates: Vec<_> = others.iter().map(|t| t.date).collect();
    dates.sort();
    let intervals: Vec<f64> = dates
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days() as f64)
        .collect();
    let interval_regularity = if intervals.len() < 2 {
        f64::INFINITY
    } else {
        sample_stdev(&intervals)
    };

    let frequency = all_transactions
        .iter()
        .filter(|t| t.name == transaction.name && days_between(t, transaction).abs() <= 30)
        .count();
    let frequency_ratio = ratio(frequency, frequency.max(1));

    let tokens: HashSet<&str> = transaction.name.split_whitespace().collect();
    let similarities: Vec<f64> = others
        .iter()
        .map(|t| jaccard_similarity(&tokens, &t.name.split_whitespace().collect()))
        .collect();
    let name_similarity = if similarities.is_empty() {
        0.0
    } else {
        mean(&similarities)
    };

    (1.0 / (1.0 + amount_stability)) * 0.3
        + (1.0 / (1.0 + interval_regularity)) * 0.3
        + frequency_ratio * 0.2
        + name_similarity * 0.2
}

/// Count transactions with exactly the same amount.
pub fn n_transactions_same_amount(
    transaction: &Transaction,
    all_transactions: &[Transaction],
) -> usize {
    all_transactions
        .iter()
        .filter(|t| t.amount == transaction.amount)
        .count()
}

/// [`n_transactions_same_amount`] as a fraction; 0 for an empty list.
pub fn pct_transactions_same_amount(
    transaction: &Transaction,
    all_transactions: &[Transaction],
) -> f64 {
    ratio(
        n_transactions_same_amount(transaction, all_transactions),
        all_transactions.len(),
    )
}

/// Compute the full feature record for `transaction`.
pub fn compute_features(transaction: &Transaction, all_transactions: &[Transaction]) -> Features {
    let all = all_transactions;
    let sequence = detect_sequence_patterns(transaction, all, DEFAULT_MIN_OCCURRENCES);

    Features {
        n_transactions_same_amount: n_transactions_same_amount(transaction, all),
        percent_transactions_same_amount: pct_transactions_same_amount(transaction, all),
        ends_in_99: ends_in_99(transaction),
        amount: transaction.amount,
        same_day_exact: n_transactions_same_day(transaction, all, 0),
        pct_transactions_same_day: pct_transactions_same_day(transaction, all, 0),
        same_day_off_by_1: n_transactions_same_day(transaction, all, 1),
        same_day_off_by_2: n_transactions_same_day(transaction, all, 2),
        days_apart_14_exact: n_transactions_days_apart(transaction, all, 14, 0),
        pct_days_apart_14_exact: pct_transactions_days_apart(transaction, all, 14, 0),
        days_apart_14_off_by_1: n_transactions_days_apart(transaction, all, 14, 1),
        pct_days_apart_14_off_by_1: pct_transactions_days_apart(transaction, all, 14, 1),
        days_apart_7_exact: n_transactions_days_apart(transaction, all, 7, 0),
        pct_days_apart_7_exact: pct_transactions_days_apart(transaction, all, 7, 0),
        days_apart_7_off_by_1: n_transactions_days_apart(transaction, all, 7, 1),
        pct_days_apart_7_off_by_1: pct_transactions_days_apart(transaction, all, 7, 1),
        is_insurance: is_insurance(transaction),
        is_utility: is_utility(transaction),
        is_phone: is_phone(transaction),
        is_always_recurring: is_always_recurring(transaction),
        is_recurring: is_recurring(transaction, all),
        recurring_transaction_confidence: recurring_transaction_confidence(transaction, all),
        sequence_confidence: sequence.confidence,
        is_sequence_weekly: if sequence.pattern == Some(SequencePattern::Weekly) {
            1.0
        } else {
            0.0
        },
        is_sequence_monthly: if sequence.pattern == Some(SequencePattern::Monthly) {
            1.0
        } else {
            0.0
        },
        sequence_length: sequence.length,
    }
}

/// Compute features for every transaction against its own group.
///
/// Groups are processed in parallel; the result follows group key order,
/// then the order of transactions within each group.
pub fn features_for_groups(grouped: &GroupedTransactions) -> Vec<(&Transaction, Features)> {
    grouped
        .par_iter()
        .flat_map_iter(|(_, group)| {
            group
                .iter()
                .map(move |tx| (tx, compute_features(tx, group)))
        })
        .collect()
}

#[cfg(test)]
#[path = "features_tests.rs"]
mod tests;
