use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::targets::TargetSpec;

/// Tool settings for the balance tuner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Settings {
    /// Game project and simulator invocation
    #[serde(default)]
    pub simulator: SimulatorSettings,

    /// Analyst model
    #[serde(default)]
    pub analyst: AnalystSettings,

    /// Ranges the best strategy has to reach
    #[serde(default)]
    pub targets: TargetSpec,

    /// Loop policy
    #[serde(default)]
    pub tuning: TuningSettings,

    /// Where run logs and iteration snapshots go
    #[serde(default)]
    pub recording: RecordingSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Simulator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulatorSettings {
    /// Godot executable (looked up in PATH when not absolute)
    #[serde(default = "default_godot_path")]
    pub godot_path: String,

    /// Game project root; `balance_config.json` lives here
    #[serde(default = "default_project_path")]
    pub project_path: PathBuf,

    /// Strategy selector passed to the simulator ("all" or an identifier)
    #[serde(default = "default_strategy")]
    pub strategy: String,

    /// Deterministic seed for every batch
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Kill the simulator after this many seconds
    #[serde(default = "default_simulator_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_godot_path() -> String {
    "godot".to_string()
}

fn default_project_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_strategy() -> String {
    "all".to_string()
}

const fn default_seed() -> u64 {
    12345
}

const fn default_simulator_timeout_secs() -> u64 {
    300
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            godot_path: default_godot_path(),
            project_path: default_project_path(),
            strategy: default_strategy(),
            seed: default_seed(),
            timeout_secs: default_simulator_timeout_secs(),
        }
    }
}

/// Analyst model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AnalystSettings {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Minimum spacing between two model calls
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    /// HTTP request timeout
    #[serde(default = "default_analyst_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "claude-haiku-4-5-20251001".to_string()
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

const fn default_max_tokens() -> u32 {
    2048
}

const fn default_min_interval_ms() -> u64 {
    1000
}

const fn default_analyst_timeout_secs() -> u64 {
    120
}

impl Default for AnalystSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            max_tokens: default_max_tokens(),
            min_interval_ms: default_min_interval_ms(),
            timeout_secs: default_analyst_timeout_secs(),
        }
    }
}

/// Loop policy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TuningSettings {
    /// Stop as `stalled` after this many consecutive iterations without
    /// applicable changes. Unset means never stop on stagnation.
    #[serde(default)]
    pub stall_limit: Option<u32>,
}

/// Run recording settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RecordingSettings {
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Mirror the human-readable run log to stdout
    #[serde(default = "default_true")]
    pub echo: bool,
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

const fn default_true() -> bool {
    true
}

impl Default for RecordingSettings {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            echo: default_true(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Optional directory for rolling JSON log files
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
