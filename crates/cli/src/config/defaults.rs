// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized default values for configuration.
//!
//! All default values are documented here for easy reference.
//! Config structs take their `Default` values from these constants.

/// Config file name searched for by discovery.
pub const CONFIG_FILE: &str = "recur-scan.toml";

/// Only supported config schema version.
pub const CONFIG_VERSION: u32 = 1;

/// Labeler assignment defaults.
pub mod assign {
    /// Number of human labelers (40).
    pub const N_LABELERS: usize = 40;

    /// Labelers per account, for consensus (3).
    pub const N_REPETITIONS: usize = 3;

    /// Accounts to label; must be a multiple of the labeler count (200).
    pub const N_ACCOUNTS: usize = 200;

    /// Accounts with fewer transactions are too sparse to label (500).
    pub const MIN_TRANSACTIONS_PER_ACCOUNT: usize = 500;

    /// Accounts with more transactions are too large to label (4000).
    pub const MAX_TRANSACTIONS_PER_ACCOUNT: usize = 4000;

    /// Lower bound of a labeler's workload (16000).
    pub const MIN_TRANSACTIONS_PER_LABELER: usize = 16000;

    /// Upper bound of a labeler's workload (24000).
    pub const MAX_TRANSACTIONS_PER_LABELER: usize = 24000;

    /// Random assignments tried before giving up (10000).
    pub const MAX_ATTEMPTS: usize = 10_000;

    /// Where per-labeler files are written.
    pub const OUTPUT_DIR: &str = "data/to_label";
}

/// Label merge defaults.
pub mod merge {
    /// Minimum weighted majority score for a consensus label (1.8).
    pub const MIN_VOTE_THRESHOLD: f64 = 1.8;

    /// Fraction of users placed in the training split (0.65).
    pub const TRAIN_RATIO: f64 = 0.65;

    /// Minimum number of `0`/`1` votes a transaction needs (3).
    pub const MIN_VOTES: usize = 3;

    /// Metric refinement rounds (5).
    pub const ROUNDS: usize = 5;

    /// Histogram buckets for majority-vote scores (20).
    pub const HISTOGRAM_BINS: usize = 20;

    pub const TRAIN_PATH: &str = "data/train.csv";
    pub const TEST_PATH: &str = "data/test.csv";
}

/// Question gathering defaults.
pub mod questions {
    pub const OUTPUT_DIR: &str = "data/questions";
}

/// Feature-test coverage defaults.
pub mod check_features {
    /// Feature function source file.
    pub const SOURCE: &str = "crates/cli/src/features.rs";

    /// Unit tests for the feature functions.
    pub const TESTS: &str = "crates/cli/src/features_tests.rs";

    /// Public functions exempt from the coverage requirement.
    pub fn exclude() -> Vec<String> {
        vec!["compute_features".to_string()]
    }
}
