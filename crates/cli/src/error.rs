// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types and process exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Command completed and every check passed.
    Success = 0,
    /// A check ran and found problems (e.g. untested feature functions).
    CheckFailed = 1,
    /// Configuration could not be loaded or is invalid.
    ConfigError = 2,
    /// Unexpected failure (I/O, malformed input).
    InternalError = 3,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

/// Errors produced by the recur-scan library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("{path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: String },

    #[error("unrecognized date '{value}' at row {row} of {path}")]
    InvalidDate {
        path: PathBuf,
        row: usize,
        value: String,
    },

    #[error("transaction {id} has no label")]
    MissingLabel { id: usize },

    #[error("need {needed} eligible accounts but only {available} are available")]
    InsufficientAccounts { needed: usize, available: usize },

    #[error("no labeler assignment satisfied the constraints after {attempts} attempts")]
    AssignmentFailed { attempts: usize },
}

impl Error {
    /// Wrap an I/O error with the path it relates to.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a CSV error with the path it relates to.
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Error::Csv {
            path: path.into(),
            source,
        }
    }

    /// Exit code a command should report when it fails with this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Error::ConfigParse { .. } | Error::ConfigInvalid(_) => ExitCode::ConfigError,
            _ => ExitCode::InternalError,
        }
    }
}

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
