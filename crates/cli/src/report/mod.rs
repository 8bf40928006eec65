// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command output formatting.
//!
//! Summaries render as colored text or pretty JSON; feature tables render
//! as CSV or JSON rows.

mod features;
mod text;

use std::io::Write;

use serde::Serialize;
use termcolor::WriteColor;

use crate::cli::OutputFormat;

pub use features::{FeatureRow, write_features_csv, write_features_json};

/// A command summary with a human-readable rendering.
pub trait TextReport {
    /// Write the summary as text, using the color scheme where it helps.
    fn write_text(&self, w: &mut dyn WriteColor) -> std::io::Result<()>;
}

/// Write `report` in the requested format.
pub fn write_report<R: TextReport + Serialize>(
    w: &mut dyn WriteColor,
    report: &R,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => report.write_text(w)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *w, report)?;
            writeln!(w)?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Render `report` as plain text, for tests and logs.
pub fn to_plain_text<R: TextReport>(report: &R) -> anyhow::Result<String> {
    let mut buf = termcolor::NoColor::new(Vec::new());
    report.write_text(&mut buf)?;
    Ok(String::from_utf8(buf.into_inner())?)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
