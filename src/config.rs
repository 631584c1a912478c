//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/composite-tree/composite-tree.toml`
//! 3. Explicit config file (`--config <FILE>`)
//! 4. Environment variables: `COMPOSITE_*` prefix, `__` between nested keys

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, IoResultExt};
use crate::domain::Labels;

/// Raw labels for intermediate parsing (`None` → not specified, inherit from base).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLabels {
    pub leaf: Option<String>,
    pub branch: Option<String>,
    pub separator: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub result_prefix: Option<String>,
    #[serde(default)]
    pub labels: RawLabels,
}

/// Unified configuration for composite-tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Prefix of every client report line (default: "Resultado")
    pub result_prefix: String,
    /// Rendering tokens
    pub labels: Labels,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            result_prefix: "Resultado".into(),
            labels: Labels::default(),
        }
    }
}

/// Get the XDG config directory for composite-tree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "composite-tree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("composite-tree.toml"))
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).with_path_context("read config", path)?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value, otherwise keep self.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            result_prefix: overlay
                .result_prefix
                .clone()
                .unwrap_or_else(|| self.result_prefix.clone()),
            labels: Labels {
                leaf: overlay
                    .labels
                    .leaf
                    .clone()
                    .unwrap_or_else(|| self.labels.leaf.clone()),
                branch: overlay
                    .labels
                    .branch
                    .clone()
                    .unwrap_or_else(|| self.labels.branch.clone()),
                separator: overlay
                    .labels
                    .separator
                    .clone()
                    .unwrap_or_else(|| self.labels.separator.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; must exist if given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|path| path.exists());
        Self::load_from(global.as_deref(), config_file)
    }

    /// Same as [`load`](Self::load) with the global file location given explicitly.
    #[instrument(level = "debug")]
    pub fn load_from(
        global: Option<&Path>,
        config_file: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global {
            debug!("loading global config {}", global_path.display());
            current = current.merge_with(&load_raw_settings(global_path)?);
        }

        if let Some(path) = config_file {
            debug!("loading config file {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;

        Ok(current)
    }

    /// Apply COMPOSITE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("COMPOSITE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("result_prefix") {
            settings.result_prefix = val;
        }
        if let Ok(val) = config.get_string("labels.leaf") {
            settings.labels.leaf = val;
        }
        if let Ok(val) = config.get_string("labels.branch") {
            settings.labels.branch = val;
        }
        if let Ok(val) = config.get_string("labels.separator") {
            settings.labels.separator = val;
        }

        Ok(settings)
    }

    /// Reject labels that would make the notation unreadable.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let labels = [
            ("labels.leaf", &self.labels.leaf),
            ("labels.branch", &self.labels.branch),
            ("labels.separator", &self.labels.separator),
        ];
        for (key, value) in labels {
            if value.contains(['(', ')']) {
                return Err(ApplicationError::Config {
                    message: format!("{} must not contain parentheses: '{}'", key, value),
                });
            }
        }
        for (key, value) in &labels[..2] {
            if value.trim().is_empty() {
                return Err(ApplicationError::Config {
                    message: format!("{} must not be empty", key),
                });
            }
        }
        Ok(())
    }

    /// TOML representation, as written to a config file.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}
