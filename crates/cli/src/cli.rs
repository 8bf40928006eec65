//! CLI argument parsing with clap derive.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::color::ColorMode;

/// Feature extraction and labeling tools for recurring-transaction detection
#[derive(Parser)]
#[command(name = "recur-scan")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Use specific config file
    #[arg(short = 'C', long = "config", global = true, env = "RECUR_SCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Color output mode
    #[arg(long, global = true, default_value = "auto", value_name = "WHEN")]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute per-transaction features for a CSV file
    Features(FeaturesArgs),
    /// Merge labeler files into consensus train/test sets
    Merge(MergeArgs),
    /// Gather series labeled `?` for review
    Questions(QuestionsArgs),
    /// Distribute accounts from raw exports to labelers
    Assign(AssignArgs),
    /// Verify every public feature function has a test
    CheckFeatures(CheckFeaturesArgs),
}

#[derive(clap::Args)]
pub struct FeaturesArgs {
    /// Transactions file (user_id,name,date,amount[,recurring])
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Input has a `recurring` label column to carry through
    #[arg(long)]
    pub labeled: bool,

    /// Write to FILE instead of stdout
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "csv")]
    pub output: FeaturesFormat,
}

#[derive(clap::Args)]
pub struct MergeArgs {
    /// Directory of labeled CSV files, one per labeler
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Training split output file
    #[arg(long, value_name = "FILE")]
    pub train: Option<PathBuf>,

    /// Test split output file
    #[arg(long, value_name = "FILE")]
    pub test: Option<PathBuf>,

    /// Seed for a reproducible train/test split
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct QuestionsArgs {
    /// Directory of in-progress labeled CSV files
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Directory the questions file is written to
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Date used to name the output file (default: today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,
}

#[derive(clap::Args)]
pub struct AssignArgs {
    /// Plaid transaction export
    #[arg(long, value_name = "FILE")]
    pub plaid: PathBuf,

    /// Internal transaction export
    #[arg(long, value_name = "FILE")]
    pub internal: PathBuf,

    /// Directory the per-labeler files are written to
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Seed for reproducible account selection and assignment
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,
}

#[derive(clap::Args)]
pub struct CheckFeaturesArgs {
    /// Feature source file
    #[arg(long, value_name = "FILE")]
    pub source: Option<PathBuf>,

    /// Feature test file
    #[arg(long, value_name = "FILE")]
    pub tests: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FeaturesFormat {
    #[default]
    Csv,
    Json,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
