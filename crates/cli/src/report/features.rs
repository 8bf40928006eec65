// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Feature table output.

use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::features::{FEATURE_NAMES, Features};
use crate::transactions::{DATE_FORMAT, Transaction};

/// Columns written before the features.
const PREFIX: [&str; 4] = ["id", "user_id", "name", "date"];
const LABEL_COLUMN: &str = "recurring";

/// One output row: a transaction, its label if known, and its features.
#[derive(Debug)]
pub struct FeatureRow<'a> {
    pub transaction: &'a Transaction,
    pub recurring: Option<bool>,
    pub features: Features,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    id: usize,
    user_id: &'a str,
    name: &'a str,
    date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    recurring: Option<u8>,
    #[serde(flatten)]
    features: &'a Features,
}

fn label_value(recurring: bool) -> u8 {
    u8::from(recurring)
}

/// Write rows as CSV with an `id,user_id,name,date[,recurring]` prefix.
pub fn write_features_csv<W: Write>(w: W, rows: &[FeatureRow], labeled: bool) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(w);

    let mut header: Vec<&str> = PREFIX.to_vec();
    if labeled {
        header.push(LABEL_COLUMN);
    }
    header.extend(FEATURE_NAMES);
    wtr.write_record(&header)?;

    for row in rows {
        let tx = row.transaction;
        wtr.write_field(tx.id.to_string())?;
        wtr.write_field(&tx.user_id)?;
        wtr.write_field(&tx.name)?;
        wtr.write_field(tx.date.format(DATE_FORMAT).to_string())?;
        if labeled {
            let label = row.recurring.map(label_value).unwrap_or(0);
            wtr.write_field(label.to_string())?;
        }
        // Completes the record started by the prefix fields.
        wtr.serialize(&row.features)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write rows as a JSON array of flat objects.
pub fn write_features_json<W: Write>(mut w: W, rows: &[FeatureRow]) -> anyhow::Result<()> {
    let json_rows: Vec<JsonRow> = rows
        .iter()
        .map(|row| JsonRow {
            id: row.transaction.id,
            user_id: &row.transaction.user_id,
            name: &row.transaction.name,
            date: row.transaction.date,
            recurring: row.recurring.map(label_value),
            features: &row.features,
        })
        .collect();
    serde_json::to_writer(&mut w, &json_rows)?;
    writeln!(w)?;
    w.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "features_tests.rs"]
mod tests;
