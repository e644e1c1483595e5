use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::{Settings, TargetRange};

/// Project-local settings file picked up from the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "balance-tuner.yaml";

/// Prefix for environment overrides, e.g. `BALANCE_TUNER_ANALYST__MODEL`
pub const ENV_PREFIX: &str = "BALANCE_TUNER_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Godot path cannot be empty")]
    EmptyGodotPath,

    #[error("Invalid {0} timeout: must be at least 1 second")]
    InvalidTimeout(&'static str),

    #[error("Invalid max_tokens: {0}. Must be at least 1")]
    InvalidMaxTokens(u32),

    #[error("Invalid target range for {name}: min ({min}) is greater than max ({max})")]
    InvalidTargetRange { name: &'static str, min: f64, max: f64 },

    #[error("Invalid stall_limit: {0}. Must be at least 1")]
    InvalidStallLimit(u32),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `balance-tuner.yaml` in the working directory (optional)
    /// 3. `explicit`, when given
    /// 4. Environment variables (`BALANCE_TUNER_*`, `__` separates sections)
    pub fn load(explicit: Option<&Path>) -> Result<Settings> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Yaml::file(DEFAULT_SETTINGS_FILE));

        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Settings file not found: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        let settings: Settings = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract settings from figment")?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Load settings from a specific file, ignoring the environment
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Settings> {
        let settings: Settings = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load settings from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Validate settings after loading
    pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&settings.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(settings.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&settings.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(
                settings.logging.format.clone(),
            ));
        }

        if settings.simulator.godot_path.trim().is_empty() {
            return Err(ConfigError::EmptyGodotPath);
        }

        if settings.simulator.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("simulator"));
        }

        if settings.analyst.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("analyst"));
        }

        if settings.analyst.max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens(settings.analyst.max_tokens));
        }

        for (name, TargetRange { min, max }) in settings.targets.entries() {
            if min > max {
                return Err(ConfigError::InvalidTargetRange { name, min, max });
            }
        }

        if let Some(0) = settings.tuning.stall_limit {
            return Err(ConfigError::InvalidStallLimit(0));
        }

        Ok(())
    }
}
