// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-command configuration sections.

use std::path::PathBuf;

use serde::Deserialize;

use super::defaults;

/// `[assign]`: distributing accounts to labelers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssignConfig {
    pub n_labelers: usize,
    pub n_repetitions: usize,
    pub n_accounts: usize,
    pub min_transactions_per_account: usize,
    pub max_transactions_per_account: usize,
    pub min_transactions_per_labeler: usize,
    pub max_transactions_per_labeler: usize,
    pub max_attempts: usize,
    pub output_dir: PathBuf,
    /// Fixed RNG seed for reproducible assignments.
    pub seed: Option<u64>,
}

impl Default for AssignConfig {
    fn default() -> Self {
        use defaults::assign::*;
        Self {
            n_labelers: N_LABELERS,
            n_repetitions: N_REPETITIONS,
            n_accounts: N_ACCOUNTS,
            min_transactions_per_account: MIN_TRANSACTIONS_PER_ACCOUNT,
            max_transactions_per_account: MAX_TRANSACTIONS_PER_ACCOUNT,
            min_transactions_per_labeler: MIN_TRANSACTIONS_PER_LABELER,
            max_transactions_per_labeler: MAX_TRANSACTIONS_PER_LABELER,
            max_attempts: MAX_ATTEMPTS,
            output_dir: PathBuf::from(OUTPUT_DIR),
            seed: None,
        }
    }
}

impl AssignConfig {
    /// Accounts each labeler receives.
    pub fn accounts_per_labeler(&self) -> usize {
        self.n_accounts / self.n_labelers * self.n_repetitions
    }

    pub(super) fn validate(&self) -> Result<(), String> {
        if self.n_labelers == 0 || self.n_repetitions == 0 || self.n_accounts == 0 {
            return Err("assign: n_labelers, n_repetitions and n_accounts must be positive".into());
        }
        if self.n_accounts % self.n_labelers != 0 {
            return Err(format!(
                "assign: n_accounts ({}) must be a multiple of n_labelers ({})",
                self.n_accounts, self.n_labelers
            ));
        }
        if self.n_repetitions > self.n_labelers {
            return Err(format!(
                "assign: n_repetitions ({}) cannot exceed n_labelers ({})",
                self.n_repetitions, self.n_labelers
            ));
        }
        if self.min_transactions_per_account > self.max_transactions_per_account {
            return Err("assign: min_transactions_per_account exceeds the maximum".into());
        }
        if self.min_transactions_per_labeler > self.max_transactions_per_labeler {
            return Err("assign: min_transactions_per_labeler exceeds the maximum".into());
        }
        if self.max_attempts == 0 {
            return Err("assign: max_attempts must be positive".into());
        }
        Ok(())
    }
}

/// `[merge]`: building consensus labels and the train/test split.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    pub min_vote_threshold: f64,
    pub train_ratio: f64,
    pub min_votes: usize,
    pub rounds: usize,
    pub histogram_bins: usize,
    pub train_path: PathBuf,
    pub test_path: PathBuf,
    /// Fixed RNG seed for a reproducible split.
    pub seed: Option<u64>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        use defaults::merge::*;
        Self {
            min_vote_threshold: MIN_VOTE_THRESHOLD,
            train_ratio: TRAIN_RATIO,
            min_votes: MIN_VOTES,
            rounds: ROUNDS,
            histogram_bins: HISTOGRAM_BINS,
            train_path: PathBuf::from(TRAIN_PATH),
            test_path: PathBuf::from(TEST_PATH),
            seed: None,
        }
    }
}

impl MergeConfig {
    pub(super) fn validate(&self) -> Result<(), String> {
        if !(self.train_ratio > 0.0 && self.train_ratio < 1.0) {
            return Err(format!(
                "merge: train_ratio must be between 0 and 1 (got {})",
                self.train_ratio
            ));
        }
        if self.min_vote_threshold < 0.0 {
            return Err("merge: min_vote_threshold cannot be negative".into());
        }
        if self.rounds == 0 {
            return Err("merge: rounds must be positive".into());
        }
        if self.histogram_bins == 0 {
            return Err("merge: histogram_bins must be positive".into());
        }
        Ok(())
    }
}

/// `[questions]`: collecting uncertain labels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuestionsConfig {
    pub output_dir: PathBuf,
}

impl Default for QuestionsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(defaults::questions::OUTPUT_DIR),
        }
    }
}

/// `[check_features]`: feature-test coverage gate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckFeaturesConfig {
    pub source: PathBuf,
    pub tests: PathBuf,
    /// Public functions that do not need their own test.
    pub exclude: Vec<String>,
}

impl Default for CheckFeaturesConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(defaults::check_features::SOURCE),
            tests: PathBuf::from(defaults::check_features::TESTS),
            exclude: defaults::check_features::exclude(),
        }
    }
}
