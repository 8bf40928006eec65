// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Assign command implementation.

use termcolor::StandardStream;

use recur_scan::ExitCode;
use recur_scan::assign::create_training_data;
use recur_scan::cli::{AssignArgs, Cli, OutputFormat};
use recur_scan::config::LoadedConfig;
use recur_scan::report::write_report;
use recur_scan::rng::make_rng;

/// Run the assign command.
pub fn run(cli: &Cli, args: &AssignArgs, loaded: &LoadedConfig) -> anyhow::Result<ExitCode> {
    let mut config = loaded.config.assign.clone();
    config.output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => loaded.path(&config.output_dir),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut rng = make_rng(config.seed);
    let report = create_training_data(&args.plaid, &args.internal, &config, &mut rng)?;

    let mut stdout = StandardStream::stdout(cli.color.stdout_choice());
    write_report(&mut stdout, &report, OutputFormat::Text)?;
    Ok(ExitCode::Success)
}
