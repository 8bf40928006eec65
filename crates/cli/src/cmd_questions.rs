// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Questions command implementation.

use anyhow::Context;
use termcolor::StandardStream;

use recur_scan::ExitCode;
use recur_scan::cli::{Cli, OutputFormat, QuestionsArgs};
use recur_scan::config::LoadedConfig;
use recur_scan::questions::{gather_questions, questions_path, write_questions};
use recur_scan::report::write_report;

/// Run the questions command.
pub fn run(cli: &Cli, args: &QuestionsArgs, loaded: &LoadedConfig) -> anyhow::Result<ExitCode> {
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| loaded.path(&loaded.config.questions.output_dir));
    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let questions = gather_questions(&args.dir)
        .with_context(|| format!("failed to gather questions from {}", args.dir.display()))?;
    let report = write_questions(&questions, &questions_path(&output_dir, date))?;

    let mut stdout = StandardStream::stdout(cli.color.stdout_choice());
    write_report(&mut stdout, &report, OutputFormat::Text)?;
    Ok(ExitCode::Success)
}
