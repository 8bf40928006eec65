// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Features command implementation.

use std::collections::HashMap;
use std::io::{BufWriter, Write};

use anyhow::Context;

use recur_scan::ExitCode;
use recur_scan::cli::{FeaturesArgs, FeaturesFormat};
use recur_scan::features::features_for_groups;
use recur_scan::report::{FeatureRow, write_features_csv, write_features_json};
use recur_scan::transactions::{
    group_transactions, read_labeled_transactions, read_unlabeled_transactions,
};

/// Run the features command.
pub fn run(args: &FeaturesArgs) -> anyhow::Result<ExitCode> {
    let (transactions, labels) = if args.labeled {
        let (txs, labels) = read_labeled_transactions(&args.input)?;
        let by_id: HashMap<usize, bool> = txs.iter().map(|t| t.id).zip(labels).collect();
        (txs, by_id)
    } else {
        (read_unlabeled_transactions(&args.input)?, HashMap::new())
    };
    tracing::info!(
        "read {} transactions from {}",
        transactions.len(),
        args.input.display()
    );

    let grouped = group_transactions(&transactions);
    tracing::info!("computing features for {} groups", grouped.len());

    let mut rows: Vec<FeatureRow> = features_for_groups(&grouped)
        .into_iter()
        .map(|(tx, features)| FeatureRow {
            transaction: tx,
            recurring: labels.get(&tx.id).copied(),
            features,
        })
        .collect();
    // Back to input order.
    rows.sort_by_key(|row| row.transaction.id);

    match &args.out {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_rows(BufWriter::new(file), &rows, args)?;
            tracing::info!("wrote {} rows to {}", rows.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            write_rows(stdout.lock(), &rows, args)?;
        }
    }
    Ok(ExitCode::Success)
}

fn write_rows<W: Write>(w: W, rows: &[FeatureRow], args: &FeaturesArgs) -> anyhow::Result<()> {
    match args.output {
        FeaturesFormat::Csv => write_features_csv(w, rows, args.labeled),
        FeaturesFormat::Json => write_features_json(w, rows),
    }
}
