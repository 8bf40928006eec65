// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Recurring-transaction feature extraction and labeling workflow.
//!
//! The library computes per-transaction features used to train a
//! recurring-charge classifier, and supports the human labeling process
//! that produces its training data: assigning accounts to labelers,
//! gathering uncertain labels, and merging labels into a consensus
//! train/test split.

pub mod assign;
pub mod cli;
pub mod color;
pub mod config;
pub mod consensus;
pub mod coverage;
pub mod discovery;
pub mod error;
pub mod features;
pub mod metrics;
pub mod questions;
pub mod report;
pub mod rng;
pub mod transactions;

#[cfg(test)]
pub mod test_utils;

pub use error::{Error, ExitCode, Result};
pub use features::{Features, compute_features};
pub use transactions::Transaction;
