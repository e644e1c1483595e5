//! Godot Simulator
//!
//! Shells out to a headless Godot build of the game, which runs the
//! simulation scene against `balance_config.json` and prints one JSON line
//! with the aggregated metrics. Everything else Godot prints (engine banner,
//! warnings) is ignored.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::{TuningError, TuningResult};
use crate::domain::models::{BalanceConfig, SimulationResults, SimulatorSettings};
use crate::domain::ports::SimulationOracle;
use crate::infrastructure::storage::CONFIG_FILE_NAME;

/// Configuration for the Godot simulator
#[derive(Debug, Clone)]
pub struct GodotSimulatorConfig {
    /// Path to the godot executable (defaults to "godot" in PATH)
    pub godot_path: String,

    /// Game project root; also the working directory of the process
    pub project_path: PathBuf,

    /// Config file handed to the game, relative to the project root
    pub config_file: String,

    /// "all" or a single strategy identifier
    pub strategy: String,

    pub seed: u64,

    pub timeout_secs: u64,
}

impl Default for GodotSimulatorConfig {
    fn default() -> Self {
        Self::from(&SimulatorSettings::default())
    }
}

impl From<&SimulatorSettings> for GodotSimulatorConfig {
    fn from(settings: &SimulatorSettings) -> Self {
        Self {
            godot_path: settings.godot_path.clone(),
            project_path: settings.project_path.clone(),
            config_file: CONFIG_FILE_NAME.to_string(),
            strategy: settings.strategy.clone(),
            seed: settings.seed,
            timeout_secs: settings.timeout_secs,
        }
    }
}

/// Simulation oracle backed by the headless game build.
pub struct GodotSimulator {
    config: GodotSimulatorConfig,
}

impl GodotSimulator {
    pub const fn new(config: GodotSimulatorConfig) -> Self {
        Self { config }
    }

    /// Build the godot command line for a batch of `runs` simulations.
    fn build_command(&self, runs: u32) -> Command {
        let mut cmd = Command::new(&self.config.godot_path);

        cmd.arg("--headless")
            .arg("--path")
            .arg(&self.config.project_path)
            .arg("--")
            .arg("--config")
            .arg(&self.config.config_file)
            .arg("--strategy")
            .arg(&self.config.strategy)
            .arg("--count")
            .arg(runs.to_string())
            .arg("--seed")
            .arg(self.config.seed.to_string())
            .arg("--json")
            .current_dir(&self.config.project_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        cmd
    }
}

/// Extract the result set from simulator stdout.
///
/// The first line whose trimmed form starts with `{` is the payload.
pub fn parse_simulation_output(stdout: &str) -> TuningResult<SimulationResults> {
    let line = stdout
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with('{'))
        .ok_or_else(|| {
            TuningError::Simulation(format!("no JSON output found in: {}", stdout.trim()))
        })?;

    serde_json::from_str(line)
        .map_err(|e| TuningError::Simulation(format!("invalid simulator JSON: {e}")))
}

#[async_trait]
impl SimulationOracle for GodotSimulator {
    #[instrument(skip(self, config), fields(parameters = config.len(), strategy = %self.config.strategy))]
    async fn run(&self, config: &BalanceConfig, runs: u32) -> TuningResult<SimulationResults> {
        let mut cmd = self.build_command(runs);
        debug!(command = ?cmd.as_std(), "spawning simulator");

        let limit = Duration::from_secs(self.config.timeout_secs);
        let output = match timeout(limit, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(TuningError::Simulation(format!(
                    "failed to spawn {}: {e}",
                    self.config.godot_path
                )))
            }
            // kill_on_drop reaps the child once the output future is dropped
            Err(_) => {
                warn!(timeout_secs = self.config.timeout_secs, "simulator timed out");
                return Err(TuningError::Simulation(format!(
                    "simulator timed out after {}s",
                    self.config.timeout_secs
                )));
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(TuningError::Simulation(format!(
                "godot exited with code {:?}: {}",
                output.status.code(),
                stderr.trim()
            )));
        }

        let results = parse_simulation_output(&String::from_utf8_lossy(&output.stdout))?;
        info!(
            runs,
            strategies = results.strategies.len(),
            "simulation batch complete"
        );

        Ok(results)
    }
}
