//! Settings loader for the tool itself.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Settings;

/// Prefix for environment overrides, e.g. `OS_MFA_HTTP__TIMEOUT_SECS=10`.
pub const ENV_PREFIX: &str = "OS_MFA_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `http.timeout_secs` is zero
    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    /// Unknown `logging.level`
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unknown `logging.format`
    #[error("Invalid log format: {0}. Must be one of: compact, pretty, json")]
    InvalidLogFormat(String),
}

/// Settings loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `<config dir>/os-mfa/config.yaml` (optional)
    /// 3. Environment variables (`OS_MFA_*` prefix, `__` separates levels)
    pub fn load() -> Result<Settings> {
        Self::load_with(Self::default_path().as_deref())
    }

    /// Same as [`Self::load`] but reading `file` instead of the default
    /// settings file.
    pub fn load_with(file: Option<&Path>) -> Result<Settings> {
        let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));
        if let Some(file) = file {
            figment = figment.merge(Yaml::file(file));
        }
        let settings: Settings = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract os-mfa settings")?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Load settings from a specific file, ignoring the environment
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Settings> {
        let settings: Settings = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .with_context(|| format!("Failed to load settings from {}", path.as_ref().display()))?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    /// `~/.config/os-mfa/config.yaml` on Linux; platform equivalent elsewhere.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("os-mfa").join("config.yaml"))
    }

    /// Validate settings after loading
    pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
        if settings.http.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(settings.http.timeout_secs));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&settings.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(settings.logging.level.clone()));
        }

        let valid_log_formats = ["compact", "pretty", "json"];
        if !valid_log_formats.contains(&settings.logging.format.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogFormat(
                settings.logging.format.clone(),
            ));
        }

        Ok(())
    }
}
