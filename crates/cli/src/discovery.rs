// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Config file discovery.
//!
//! Looks for `recur-scan.toml` in the working directory and its ancestors,
//! stopping at the enclosing git repository root.

use std::path::{Path, PathBuf};

use crate::config::defaults::CONFIG_FILE;

/// Nearest `recur-scan.toml` at or above `start_dir`, without leaving the
/// git repository that contains it.
///
/// A `.git` file (worktrees, submodules) marks a root as well as a `.git`
/// directory.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!("found config at {}", candidate.display());
            return Some(candidate);
        }
        if dir.join(".git").exists() {
            tracing::debug!("no {} below git root {}", CONFIG_FILE, dir.display());
            return None;
        }
    }
    tracing::debug!("no {} above {}", CONFIG_FILE, start_dir.display());
    None
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
