// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod cmd_assign;
mod cmd_check_features;
mod cmd_features;
mod cmd_merge;
mod cmd_questions;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use recur_scan::cli::{Cli, Command};
use recur_scan::config;
use recur_scan::{Error, ExitCode};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code.into(),
        Err(e) => {
            eprintln!("recur-scan: {:#}", e);
            exit_code_for(&e).into()
        }
    }
}

/// Install the global subscriber; `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .ok();
}

fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    err.chain()
        .find_map(|e| e.downcast_ref::<Error>())
        .map(Error::exit_code)
        .unwrap_or(ExitCode::InternalError)
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let loaded = config::resolve(&cwd, cli.config.as_deref())?;
    if let Some(ref source) = loaded.source {
        tracing::debug!("using config {}", source.display());
    }

    match &cli.command {
        Command::Features(args) => cmd_features::run(args),
        Command::Merge(args) => cmd_merge::run(cli, args, &loaded),
        Command::Questions(args) => cmd_questions::run(cli, args, &loaded),
        Command::Assign(args) => cmd_assign::run(cli, args, &loaded),
        Command::CheckFeatures(args) => cmd_check_features::run(cli, args, &loaded),
    }
}
