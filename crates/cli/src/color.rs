// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal color handling.

use std::io::IsTerminal;

use termcolor::{Color, ColorChoice, ColorSpec};

/// `--color` setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Decide whether to emit color.
///
/// `auto` colors only a terminal, and `NO_COLOR` turns it off.
pub fn resolve_color(mode: ColorMode, is_terminal: bool, no_color_env: bool) -> ColorChoice {
    match mode {
        ColorMode::Always => ColorChoice::Always,
        ColorMode::Never => ColorChoice::Never,
        ColorMode::Auto if no_color_env || !is_terminal => ColorChoice::Never,
        ColorMode::Auto => ColorChoice::Auto,
    }
}

impl ColorMode {
    /// Color choice for stdout in the current environment.
    pub fn stdout_choice(self) -> ColorChoice {
        resolve_color(
            self,
            std::io::stdout().is_terminal(),
            std::env::var_os("NO_COLOR").is_some(),
        )
    }
}

/// Color scheme for text output.
pub mod scheme {
    use super::*;

    /// Labeler names, function names and section headers.
    pub fn name() -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_bold(true);
        spec
    }

    pub fn pass() -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Green)).set_bold(true);
        spec
    }

    pub fn fail() -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Red)).set_bold(true);
        spec
    }

    /// File paths.
    pub fn path() -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Cyan));
        spec
    }

    /// Counts and scores.
    pub fn number() -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Yellow));
        spec
    }
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
