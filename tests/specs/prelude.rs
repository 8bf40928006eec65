//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for testing recur-scan CLI behavior.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub use assert_cmd::prelude::*;
pub use predicates;
pub use predicates::prelude::PredicateBooleanExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Returns a Command configured to run the recur-scan binary.
///
/// `RUST_LOG` and `RECUR_SCAN_CONFIG` are cleared so the host environment
/// cannot change output.
pub fn recur_scan_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("recur-scan"));
    cmd.env_remove("RUST_LOG").env_remove("RECUR_SCAN_CONFIG");
    cmd
}

/// Repository root (two levels above the cli crate).
pub fn repo_root() -> PathBuf {
    let manifest_dir =
        std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR should be set");
    PathBuf::from(manifest_dir)
        .parent()
        .expect("parent should exist")
        .parent()
        .expect("grandparent should exist")
        .to_path_buf()
}

/// Get path to a test fixture file or directory.
pub fn fixture(name: &str) -> PathBuf {
    repo_root().join("tests").join("fixtures").join(name)
}

/// A temporary project directory, isolated from any enclosing config.
pub struct Project {
    dir: TempDir,
}

impl Project {
    /// An empty project with a `.git` marker so discovery stops here.
    pub fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        Self { dir }
    }

    /// A project with the given `recur-scan.toml`.
    pub fn with_config(config: &str) -> Self {
        let project = Self::empty();
        project.file("recur-scan.toml", config);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file, creating parent directories.
    pub fn file(&self, path: &str, content: &str) {
        let full = self.dir.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }

    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(path)).unwrap()
    }

    /// Run recur-scan with `args` from the project directory.
    pub fn run(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        recur_scan_cmd()
            .args(args)
            .current_dir(self.path())
            .assert()
    }
}

/// Captured stdout of a finished command.
pub fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}
