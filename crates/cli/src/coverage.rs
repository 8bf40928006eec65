// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Feature-test coverage gate.
//!
//! Every public function in the feature source must be referenced by the
//! feature test file, either by name or through a test function named
//! after it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};

/// Marker after which source items are test-only.
const TEST_MARKER: &str = "#[cfg(test)]";

#[allow(clippy::expect_used)]
static PUB_FN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*pub(?:\([^)]*\))?\s+(?:(?:const|async|unsafe)\s+)*fn\s+([A-Za-z_][A-Za-z0-9_]*)",
    )
    .expect("valid regex pattern")
});

#[allow(clippy::expect_used)]
static FN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?fn\s+([A-Za-z_][A-Za-z0-9_]*)")
        .expect("valid regex pattern")
});

#[allow(clippy::expect_used)]
static IDENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("valid regex pattern"));

/// Comments, plus string and char literals so comment markers inside them
/// are skipped over.
#[allow(clippy::expect_used)]
static COMMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"(?:[^"\\]|\\.)*"|'(?:[^'\\\n]|\\.)'|/\*.*?\*/|//[^\n]*"#)
        .expect("valid regex pattern")
});

/// Public function names in `source`, in order of first appearance.
///
/// Names with a leading underscore, names in `exclude`, and anything after
/// the first `#[cfg(test)]` are skipped.
pub fn public_functions(source: &str, exclude: &[String]) -> Vec<String> {
    let source = match source.find(TEST_MARKER) {
        Some(end) => &source[..end],
        None => source,
    };
    let source = strip_comments(source);

    let mut seen = HashSet::new();
    PUB_FN_PATTERN
        .captures_iter(&source)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|name| !name.starts_with('_'))
        .filter(|name| !exclude.iter().any(|e| e == name))
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Remove line and block comments, leaving string literals intact.
pub fn strip_comments(source: &str) -> String {
    COMMENT_PATTERN
        .replace_all(source, |caps: &regex::Captures<'_>| {
            let m = &caps[0];
            if m.starts_with('"') || m.starts_with('\'') {
                m.to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// What a test file references.
#[derive(Debug, Default)]
pub struct TestIndex {
    identifiers: HashSet<String>,
    test_fns: Vec<String>,
}

impl TestIndex {
    pub fn parse(tests: &str) -> Self {
        let tests = strip_comments(tests);
        let identifiers = IDENT_PATTERN
            .find_iter(&tests)
            .map(|m| m.as_str().to_string())
            .collect();
        let test_fns = FN_PATTERN
            .captures_iter(&tests)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect();
        Self {
            identifiers,
            test_fns,
        }
    }

    /// Whether `name` is referenced directly or has a test named after it.
    pub fn covers(&self, name: &str) -> bool {
        if self.identifiers.contains(name) {
            return true;
        }
        self.test_fns.iter().any(|f| {
            f.strip_prefix("test_") == Some(name)
                || f.strip_prefix(name).is_some_and(|rest| rest.starts_with('_'))
        })
    }
}

/// Result of a coverage check.
#[derive(Debug, Serialize)]
pub struct CoverageReport {
    pub source: PathBuf,
    pub tests: PathBuf,
    pub public_functions: Vec<String>,
    pub untested: Vec<String>,
}

impl CoverageReport {
    pub fn passed(&self) -> bool {
        self.untested.is_empty()
    }
}

/// Check that every public function of `source` is covered by `tests`.
pub fn check_coverage(source: &Path, tests: &Path, exclude: &[String]) -> Result<CoverageReport> {
    let source_text = std::fs::read_to_string(source).map_err(|e| Error::io(source, e))?;
    let tests_text = std::fs::read_to_string(tests).map_err(|e| Error::io(tests, e))?;

    let public = public_functions(&source_text, exclude);
    let index = TestIndex::parse(&tests_text);
    let untested: Vec<String> = public
        .iter()
        .filter(|name| !index.covers(name))
        .cloned()
        .collect();
    tracing::debug!(
        "{} public functions, {} untested",
        public.len(),
        untested.len()
    );

    Ok(CoverageReport {
        source: source.to_path_buf(),
        tests: tests.to_path_buf(),
        public_functions: public,
        untested,
    })
}

#[cfg(test)]
#[path = "coverage_tests.rs"]
mod tests;
