// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text rendering of command summaries.

use std::io::{Result, Write};

use termcolor::{ColorSpec, WriteColor};

use super::TextReport;
use crate::assign::AssignReport;
use crate::color::scheme;
use crate::consensus::MergeReport;
use crate::coverage::CoverageReport;
use crate::questions::QuestionsReport;

/// Widest histogram bar, in characters.
const HISTOGRAM_WIDTH: usize = 40;

fn colored(w: &mut dyn WriteColor, spec: &ColorSpec, text: &str) -> Result<()> {
    w.set_color(spec)?;
    write!(w, "{}", text)?;
    w.reset()
}

impl TextReport for MergeReport {
    fn write_text(&self, w: &mut dyn WriteColor) -> Result<()> {
        writeln!(
            w,
            "Read {} transactions from {} files ({} labelers)",
            self.transactions_read,
            self.files,
            self.labelers.len()
        )?;
        writeln!(
            w,
            "{} unique transactions, {} with enough definite votes",
            self.unique_transactions, self.decided_transactions
        )?;
        writeln!(w)?;

        colored(w, &scheme::name(), "Labelers")?;
        writeln!(w)?;
        let width = self.labelers.iter().map(String::len).max().unwrap_or(0);
        for (labeler, m) in self.ranked_labelers() {
            write!(w, "  {:<width$}  score ", labeler)?;
            colored(w, &scheme::number(), &format!("{:.3}", m.score))?;
            writeln!(
                w,
                "  precision {:.3}  recall {:.3}  tp {} fp {} fn {} tn {}",
                m.precision, m.recall, m.tp, m.fp, m.fn_, m.tn
            )?;
        }
        writeln!(w)?;

        colored(w, &scheme::name(), "Majority-vote scores")?;
        writeln!(w)?;
        let max = self
            .majority_score_histogram
            .iter()
            .map(|b| b.count)
            .max()
            .unwrap_or(0);
        for bin in &self.majority_score_histogram {
            let bar = if max == 0 {
                0
            } else {
                bin.count * HISTOGRAM_WIDTH / max
            };
            writeln!(
                w,
                "  {:>6.2} .. {:<6.2} {:<bar_width$} {}",
                bin.lower,
                bin.upper,
                "#".repeat(bar),
                bin.count,
                bar_width = HISTOGRAM_WIDTH
            )?;
        }
        writeln!(w)?;

        writeln!(
            w,
            "{} consensus transactions (score >= {})",
            self.consensus_transactions, self.min_vote_threshold
        )?;
        writeln!(
            w,
            "train: {} users, {} rows",
            self.train_users, self.train_rows
        )?;
        writeln!(w, "test: {} users, {} rows", self.test_users, self.test_rows)
    }
}

impl TextReport for CoverageReport {
    fn write_text(&self, w: &mut dyn WriteColor) -> Result<()> {
        let source = self.source.display().to_string();
        if self.passed() {
            colored(w, &scheme::pass(), "PASS")?;
            write!(
                w,
                " all {} public functions in ",
                self.public_functions.len()
            )?;
            colored(w, &scheme::path(), &source)?;
            return writeln!(w, " have tests");
        }

        colored(w, &scheme::fail(), "FAIL")?;
        write!(w, " {} public functions in ", self.untested.len())?;
        colored(w, &scheme::path(), &source)?;
        writeln!(w, " have no tests:")?;
        for name in &self.untested {
            write!(w, "  - ")?;
            colored(w, &scheme::name(), name)?;
            writeln!(w)?;
        }
        Ok(())
    }
}

impl TextReport for AssignReport {
    fn write_text(&self, w: &mut dyn WriteColor) -> Result<()> {
        writeln!(
            w,
            "Combined {} transactions from {} users",
            self.transactions, self.users
        )?;
        writeln!(
            w,
            "{} eligible users, selected {} accounts with {} transactions",
            self.eligible_users, self.selected_users, self.selected_transactions
        )?;
        for (labeler, (total, path)) in self.labeler_totals.iter().zip(&self.files).enumerate() {
            write!(w, "  labeler {:<3} ", labeler)?;
            colored(w, &scheme::number(), &format!("{:>6}", total))?;
            write!(w, " transactions  ")?;
            colored(w, &scheme::path(), &path.display().to_string())?;
            writeln!(w)?;
        }
        Ok(())
    }
}

impl TextReport for QuestionsReport {
    fn write_text(&self, w: &mut dyn WriteColor) -> Result<()> {
        write!(
            w,
            "{} questioned series, {} vendors, {} rows written to ",
            self.series, self.vendors, self.rows
        )?;
        colored(w, &scheme::path(), &self.output.display().to_string())?;
        writeln!(w)
    }
}
