// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Merge command implementation.

use anyhow::Context;
use termcolor::StandardStream;

use recur_scan::ExitCode;
use recur_scan::cli::{Cli, MergeArgs};
use recur_scan::config::LoadedConfig;
use recur_scan::consensus::merge_directory;
use recur_scan::report::write_report;
use recur_scan::rng::make_rng;

/// Run the merge command.
pub fn run(cli: &Cli, args: &MergeArgs, loaded: &LoadedConfig) -> anyhow::Result<ExitCode> {
    let mut config = loaded.config.merge.clone();
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let train_path = args
        .train
        .clone()
        .unwrap_or_else(|| loaded.path(&config.train_path));
    let test_path = args
        .test
        .clone()
        .unwrap_or_else(|| loaded.path(&config.test_path));

    let mut rng = make_rng(config.seed);
    let outcome = merge_directory(&args.dir, &config, &mut rng)
        .with_context(|| format!("failed to merge labels in {}", args.dir.display()))?;
    outcome.split.write(&train_path, &test_path)?;

    let mut stdout = StandardStream::stdout(cli.color.stdout_choice());
    write_report(&mut stdout, &outcome.report, args.output)?;
    Ok(ExitCode::Success)
}
