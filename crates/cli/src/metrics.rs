// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Labeler agreement metrics.

use serde::Serialize;

/// Confusion counts and derived scores for one labeler, measured
/// against the weighted majority vote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelerMetrics {
    /// False positives.
    pub fp: usize,
    /// False negatives.
    #[serde(rename = "fn")]
    pub fn_: usize,
    /// True positives.
    pub tp: usize,
    /// True negatives.
    pub tn: usize,
    pub precision: f64,
    pub recall: f64,
    /// F1 score, used as the labeler's vote weight.
    pub score: f64,
}

impl Default for LabelerMetrics {
    /// A fresh labeler: no counts, full voting weight.
    fn default() -> Self {
        Self {
            fp: 0,
            fn_: 0,
            tp: 0,
            tn: 0,
            precision: 0.0,
            recall: 0.0,
            score: 1.0,
        }
    }
}

fn safe_div(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

impl LabelerMetrics {
    /// Zero the confusion counts, keeping the current score.
    pub fn reset_counts(&mut self) {
        self.fp = 0;
        self.fn_ = 0;
        self.tp = 0;
        self.tn = 0;
    }

    /// Derive precision, recall and F1 from the counts.
    ///
    /// Zero denominators yield 0.0.
    pub fn recompute(&mut self) {
        let tp = self.tp as f64;
        self.precision = safe_div(tp, tp + self.fp as f64);
        self.recall = safe_div(tp, tp + self.fn_ as f64);
        self.score = safe_div(
            2.0 * self.precision * self.recall,
            self.precision + self.recall,
        );
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
