// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Check-features command implementation.

use termcolor::StandardStream;

use recur_scan::ExitCode;
use recur_scan::cli::{CheckFeaturesArgs, Cli};
use recur_scan::config::LoadedConfig;
use recur_scan::coverage::check_coverage;
use recur_scan::report::write_report;

/// Run the check-features command.
pub fn run(cli: &Cli, args: &CheckFeaturesArgs, loaded: &LoadedConfig) -> anyhow::Result<ExitCode> {
    let settings = &loaded.config.check_features;
    let source = args
        .source
        .clone()
        .unwrap_or_else(|| loaded.path(&settings.source));
    let tests = args
        .tests
        .clone()
        .unwrap_or_else(|| loaded.path(&settings.tests));

    let report = check_coverage(&source, &tests, &settings.exclude)?;

    let mut stdout = StandardStream::stdout(cli.color.stdout_choice());
    write_report(&mut stdout, &report, args.output)?;

    if report.passed() {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::CheckFailed)
    }
}
