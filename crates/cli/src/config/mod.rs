// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration loading for `recur-scan.toml`.
//!
//! Every section is optional and falls back to the values in
//! [`defaults`]. Unknown keys are rejected so typos surface immediately.

mod commands;
pub mod defaults;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::discovery::find_config;
use crate::error::{Error, Result};

pub use commands::{AssignConfig, CheckFeaturesConfig, MergeConfig, QuestionsConfig};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Schema version; must be 1.
    pub version: u32,

    #[serde(default)]
    pub assign: AssignConfig,

    #[serde(default)]
    pub merge: MergeConfig,

    #[serde(default)]
    pub questions: QuestionsConfig,

    #[serde(default)]
    pub check_features: CheckFeaturesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: defaults::CONFIG_VERSION,
            assign: AssignConfig::default(),
            merge: MergeConfig::default(),
            questions: QuestionsConfig::default(),
            check_features: CheckFeaturesConfig::default(),
        }
    }
}

impl Config {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.version != defaults::CONFIG_VERSION {
            return Err(Error::ConfigInvalid(format!(
                "unsupported config version {} (expected {})",
                self.version,
                defaults::CONFIG_VERSION
            )));
        }
        self.assign.validate().map_err(Error::ConfigInvalid)?;
        self.merge.validate().map_err(Error::ConfigInvalid)?;
        Ok(())
    }
}

/// Parse and validate config content; `path` is used for error messages.
pub fn parse(content: &str, path: &Path) -> Result<Config> {
    let config: Config = toml::from_str(content).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

/// Read, parse and validate a config file.
pub fn load(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let config = parse(&content, path)?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Configuration together with the directory its relative paths resolve against.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// Directory of the config file, or the working directory without one.
    pub root: PathBuf,
    /// Config file in effect, if any.
    pub source: Option<PathBuf>,
}

impl LoadedConfig {
    /// Resolve a path from the config against its root.
    pub fn path(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

/// Load the explicit config file, or discover one from `cwd`, or fall back to defaults.
pub fn resolve(cwd: &Path, explicit: Option<&Path>) -> Result<LoadedConfig> {
    let source = match explicit {
        Some(path) => Some(cwd.join(path)),
        None => find_config(cwd),
    };
    let Some(source) = source else {
        tracing::debug!("no {} found, using defaults", defaults::CONFIG_FILE);
        return Ok(LoadedConfig {
            config: Config::default(),
            root: cwd.to_path_buf(),
            source: None,
        });
    };

    let config = load(&source)?;
    let root = source
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.to_path_buf());
    Ok(LoadedConfig {
        config,
        root,
        source: Some(source),
    })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
