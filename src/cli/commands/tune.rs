//! Implementation of the tuning run.

use anyhow::{Context, Result};
use async_trait::async_trait;
use console::style;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::cli::output::progress::{create_spinner, ProgressBarExt};
use crate::cli::output::table::TableFormatter;
use crate::cli::output::{output, CommandOutput};
use crate::cli::types::Cli;
use crate::domain::errors::TuningResult;
use crate::domain::models::{
    BalanceConfig, LoopState, Settings, SimulationResults, TargetSpec, TuningReport,
};
use crate::domain::ports::SimulationOracle;
use crate::infrastructure::claude::{ClaudeAnalyst, ClaudeClient, ClaudeClientConfig};
use crate::infrastructure::recording::FileRunRecorder;
use crate::infrastructure::simulator::{GodotSimulator, GodotSimulatorConfig};
use crate::infrastructure::storage::JsonConfigStore;
use crate::services::{ControllerConfig, ConvergenceController};

/// Shows a spinner on stderr while a simulation batch runs.
struct SpinnerSimulator {
    inner: Arc<dyn SimulationOracle>,
    hidden: bool,
}

#[async_trait]
impl SimulationOracle for SpinnerSimulator {
    async fn run(&self, config: &BalanceConfig, runs: u32) -> TuningResult<SimulationResults> {
        let spinner = create_spinner(self.hidden);
        spinner.set_message(format!("Simulating {runs} runs per strategy..."));

        let result = self.inner.run(config, runs).await;
        match &result {
            Ok(results) => spinner.finish_success(format!(
                "{} strategies simulated",
                results.strategies.len()
            )),
            Err(err) => spinner.finish_error(err.to_string()),
        }
        result
    }
}

#[derive(Debug, Serialize)]
pub struct TuneOutput {
    #[serde(flatten)]
    pub report: TuningReport,
    pub targets: TargetSpec,
    pub dry_run: bool,
}

impl CommandOutput for TuneOutput {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let mut lines = Vec::new();

        if let Some(results) = self.report.last_results() {
            lines.push(style("Last simulation results").bold().to_string());
            lines.push(formatter.format_results(results, &self.targets));
        }
        if !self.report.records.is_empty() {
            lines.push(style("Iterations").bold().to_string());
            lines.push(formatter.format_history(&self.report.records));
        }

        let outcome = &self.report.outcome;
        let label = format!("{outcome}");
        let styled = if outcome.is_success() {
            style(label).green().bold()
        } else if matches!(outcome, LoopState::Failed(_)) {
            style(label).red().bold()
        } else {
            style(label).yellow().bold()
        };
        lines.push(format!(
            "Outcome: {styled} after {} iteration(s){}",
            self.report.iterations_run,
            if self.dry_run { " (dry run)" } else { "" }
        ));

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Wire the adapters, run the loop, print the report.
///
/// The returned report is also printed; callers use it for the exit code.
pub async fn execute(cli: Cli, mut settings: Settings) -> Result<TuningReport> {
    if let Some(project) = cli.project {
        settings.simulator.project_path = project;
    }
    let project_path = settings.simulator.project_path.clone();

    let client_config = ClaudeClientConfig::from_env(&settings.analyst)
        .context("Analyst model is not configured")?;
    let client = ClaudeClient::new(client_config).context("Failed to create Claude client")?;
    let analyst = ClaudeAnalyst::new(client, settings.analyst.model.clone(), settings.analyst.max_tokens);

    let store = JsonConfigStore::in_project(&project_path);
    info!(path = %store.path().display(), "using balance config");

    let simulator = SpinnerSimulator {
        inner: Arc::new(GodotSimulator::new(GodotSimulatorConfig::from(
            &settings.simulator,
        ))),
        hidden: cli.json || !console::user_attended_stderr(),
    };

    let recorder = FileRunRecorder::new(
        &settings.recording.results_dir,
        settings.recording.echo && !cli.json,
    )
    .context("Failed to open run log")?;

    let controller = ConvergenceController::new(
        Arc::new(store),
        Arc::new(simulator),
        Arc::new(analyst),
        Arc::new(recorder),
        ControllerConfig {
            goal: cli.goal,
            targets: settings.targets,
            max_iterations: cli.max_iterations,
            runs: cli.runs,
            analyze_only: cli.dry_run,
            stall_limit: settings.tuning.stall_limit,
        },
    );

    let report = controller.run().await;

    let tune_output = TuneOutput {
        report,
        targets: settings.targets,
        dry_run: cli.dry_run,
    };
    output(&tune_output, cli.json);

    Ok(tune_output.report)
}
