//! Human-readable run log plus JSON snapshots under a results directory.

use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

use crate::domain::errors::{TuningError, TuningResult};
use crate::domain::models::{
    BalanceConfig, IterationRecord, LoopState, Recommendation, SimulationResults, TargetSpec,
    TuningReport,
};
use crate::domain::ports::{RunEvent, RunRecorder};
use crate::services::board_renderer::{render_board, STRATEGIES};

const BANNER_WIDTH: usize = 60;
const RULE_WIDTH: usize = 40;

/// Parameters echoed at the start of every iteration
const KEY_PARAMETERS: &[&str] = &[
    "starting_gold",
    "wall_cost",
    "archer_cost",
    "archer_damage",
    "archer_attack_speed_ms",
    "archer_range",
    "grunt_hp",
    "runner_hp",
    "shrine_hp",
];

#[derive(Debug, Default)]
struct RunSummary {
    goal: String,
    targets: Option<TargetSpec>,
    iterations: Vec<IterationRecord>,
}

#[derive(Serialize)]
struct RunSummaryFile<'a> {
    goal: &'a str,
    targets: Option<&'a TargetSpec>,
    outcome: &'a LoopState,
    iterations: &'a [IterationRecord],
}

/// Writes `run_<id>.log`, `iteration_<id>_<n>.json` and `run_<id>.json`
/// into the results directory, optionally echoing the log to stdout.
pub struct FileRunRecorder {
    results_dir: PathBuf,
    run_id: String,
    log_path: PathBuf,
    echo: bool,
    log_file: Mutex<File>,
    summary: Mutex<RunSummary>,
}

impl FileRunRecorder {
    /// Create a recorder whose run id is the current local time
    /// (`YYYYmmdd_HHMMSS`).
    pub fn new(results_dir: impl AsRef<Path>, echo: bool) -> TuningResult<Self> {
        let run_id = Local::now().format("%Y%m%d_%H%M%S").to_string();
        Self::with_run_id(results_dir, run_id, echo)
    }

    pub fn with_run_id(
        results_dir: impl AsRef<Path>,
        run_id: impl Into<String>,
        echo: bool,
    ) -> TuningResult<Self> {
        let results_dir = results_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&results_dir).map_err(|e| {
            TuningError::Storage(format!(
                "failed to create results directory {}: {e}",
                results_dir.display()
            ))
        })?;

        let run_id = run_id.into();
        let log_path = results_dir.join(format!("run_{run_id}.log"));
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .map_err(|e| {
                TuningError::Storage(format!("failed to open {}: {e}", log_path.display()))
            })?;

        info!(run_id = %run_id, dir = %results_dir.display(), "recording run");

        Ok(Self {
            results_dir,
            run_id,
            log_path,
            echo,
            log_file: Mutex::new(log_file),
            summary: Mutex::new(RunSummary::default()),
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn summary_path(&self) -> PathBuf {
        self.results_dir.join(format!("run_{}.json", self.run_id))
    }

    pub fn iteration_path(&self, iteration: u32) -> PathBuf {
        self.results_dir
            .join(format!("iteration_{}_{iteration}.json", self.run_id))
    }

    fn write_lines(&self, lines: &[String]) -> TuningResult<()> {
        let timestamp = Local::now().format("%H:%M:%S");
        let mut file = self
            .log_file
            .lock()
            .map_err(|_| TuningError::Storage("run log lock poisoned".to_string()))?;

        for line in lines {
            let stamped = format!("[{timestamp}] {line}");
            if self.echo {
                println!("{stamped}");
            }
            writeln!(file, "{stamped}")?;
        }
        file.flush()?;
        Ok(())
    }

    fn lock_summary(&self) -> TuningResult<std::sync::MutexGuard<'_, RunSummary>> {
        self.summary
            .lock()
            .map_err(|_| TuningError::Storage("run summary lock poisoned".to_string()))
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> TuningResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| TuningError::Storage(format!("failed to serialize {}: {e}", path.display())))?;
    std::fs::write(path, json)
        .map_err(|e| TuningError::Storage(format!("failed to write {}: {e}", path.display())))
}

#[async_trait]
impl RunRecorder for FileRunRecorder {
    async fn event(&self, event: RunEvent<'_>) -> TuningResult<()> {
        if let RunEvent::Started { goal, targets } = event {
            let mut summary = self.lock_summary()?;
            summary.goal = goal.to_string();
            summary.targets = Some(*targets);
        }
        self.write_lines(&render_event(&event))
    }

    async fn record_iteration(&self, record: &IterationRecord) -> TuningResult<()> {
        let path = self.iteration_path(record.iteration);
        write_json(&path, record)?;
        debug!(iteration = record.iteration, path = %path.display(), "iteration snapshot written");

        self.lock_summary()?.iterations.push(record.clone());
        Ok(())
    }

    async fn finish(&self, report: &TuningReport) -> TuningResult<()> {
        let summary_path = self.summary_path();
        {
            let summary = self.lock_summary()?;
            write_json(
                &summary_path,
                &RunSummaryFile {
                    goal: &summary.goal,
                    targets: summary.targets.as_ref(),
                    outcome: &report.outcome,
                    iterations: &summary.iterations,
                },
            )?;
        }

        let mut lines = vec![String::new()];
        lines.extend(banner("OPTIMIZATION COMPLETE"));
        lines.push(format!("Total iterations: {}", report.records.len()));
        lines.push(format!("Log saved to: {}", self.log_path.display()));
        lines.push(format!("Data saved to: {}", summary_path.display()));
        self.write_lines(&lines)
    }
}

fn banner(title: &str) -> [String; 3] {
    let rule = "=".repeat(BANNER_WIDTH);
    [rule.clone(), title.to_string(), rule]
}

/// Log lines for one event, without timestamps.
pub fn render_event(event: &RunEvent<'_>) -> Vec<String> {
    match *event {
        RunEvent::Started { goal, targets } => render_start(goal, targets),
        RunEvent::IterationStarted { iteration } => {
            let rule = "-".repeat(RULE_WIDTH);
            vec![rule.clone(), format!("ITERATION {}", iteration + 1), rule]
        }
        RunEvent::Config(config) => render_config(config),
        RunEvent::Results(results) => render_results(results),
        RunEvent::Recommendation(recommendation) => render_recommendation(recommendation),
        RunEvent::ChangesApplied(changes) => std::iter::once("Changes applied:".to_string())
            .chain(changes.iter().map(|(key, value)| format!("  {key} -> {value}")))
            .collect(),
        RunEvent::DryRun => vec!["DRY RUN - changes not applied".to_string()],
        RunEvent::Stagnation { consecutive, .. } => vec![format!(
            "WARNING: No changes recommended ({consecutive} in a row) - tuning may be stuck"
        )],
        RunEvent::Stopped { iteration, state } => render_stop(iteration, state),
    }
}

fn render_start(goal: &str, targets: &TargetSpec) -> Vec<String> {
    let mut lines: Vec<String> = banner("AI BALANCE OPTIMIZER").into();
    lines.push(format!("Goal: {goal}"));
    lines.push("Targets:".to_string());
    for (name, range) in targets.entries() {
        lines.push(format!("  {name}: {} - {}", range.min, range.max));
    }
    lines.push(String::new());

    lines.push("STRATEGY LAYOUTS:".to_string());
    lines.push(String::new());
    for layout in STRATEGIES {
        lines.extend(render_board(layout.id).lines().map(str::to_string));
        lines.push(String::new());
    }
    lines
}

fn render_config(config: &BalanceConfig) -> Vec<String> {
    std::iter::once("Current Config:".to_string())
        .chain(KEY_PARAMETERS.iter().filter_map(|key| {
            config.get(key).map(|value| format!("  {key}: {value}"))
        }))
        .collect()
}

fn render_results(results: &SimulationResults) -> Vec<String> {
    let mut lines = vec!["Simulation Results:".to_string()];
    for (id, metrics) in &results.strategies {
        lines.push(format!("  Strategy {} ({}):", id.to_uppercase(), metrics.name));
        lines.push(format!("    Win rate: {:.1}%", metrics.win_rate * 100.0));
        lines.push(format!("    Shrine HP: {:.1}", metrics.avg_shrine_hp));
        lines.push(format!("    Gold: {:.1}", metrics.avg_gold));
        lines.push(format!(
            "    Killed/Leaked: {:.0}/{:.0}",
            metrics.avg_killed, metrics.avg_leaked
        ));
    }
    lines
}

fn render_recommendation(rec: &Recommendation) -> Vec<String> {
    let mut lines = vec![
        "Analyst Recommendation:".to_string(),
        format!("  {}", or_placeholder(&rec.analysis, "No analysis")),
        format!("  Best strategy: {}", rec.best_strategy.as_deref().unwrap_or("?")),
        format!("  Off-target: [{}]", rec.off_target_metrics.join(", ")),
        format!("  Reasoning: {}", or_placeholder(&rec.reasoning, "No reasoning")),
        format!(
            "  Expected impact: {}",
            or_placeholder(&rec.expected_impact, "Unknown")
        ),
        format!("  Confidence: {}%", rec.confidence),
    ];

    if let Some(error) = &rec.error {
        lines.push(format!("  Parse error: {error}"));
    }

    let changes = rec.applicable_changes();
    if !changes.is_empty() {
        lines.push("  Recommended changes:".to_string());
        for (key, value) in &changes {
            if let Some(value) = value {
                lines.push(format!("    {key}: {value}"));
            }
        }
    }
    lines
}

fn render_stop(iteration: u32, state: &LoopState) -> Vec<String> {
    let mut lines = vec![String::new()];
    match state {
        LoopState::Succeeded => {
            lines.extend(banner(&format!(
                "SUCCESS! Targets met after {} iterations",
                iteration + 1
            )));
        }
        LoopState::Converged => {
            lines.push(format!(
                "Analyst reports convergence at iteration {}",
                iteration + 1
            ));
        }
        LoopState::Stalled => {
            lines.extend(banner("STALLED - no applicable changes, stopping early"));
        }
        LoopState::MaxIterationsReached => {
            lines.extend(banner("MAX ITERATIONS REACHED - targets not fully met"));
        }
        LoopState::Failed(cause) => {
            lines.extend(banner(&format!(
                "FAILED at iteration {}: {}",
                iteration + 1,
                cause.message
            )));
        }
        LoopState::Running { .. } => {}
    }
    lines
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{FailureCause, FailureKind, StrategyMap, StrategyMetrics};
    use serde_json::Number;

    #[test]
    fn test_render_start_includes_targets_and_boards() {
        let targets = TargetSpec::default();
        let lines = render_event(&RunEvent::Started {
            goal: "Make it harder",
            targets: &targets,
        });

        assert_eq!(lines[1], "AI BALANCE OPTIMIZER");
        assert!(lines.contains(&"Goal: Make it harder".to_string()));
        assert!(lines.contains(&"  win_rate: 0.95 - 1".to_string()));
        assert!(lines.contains(&"Strategy A: DualTower".to_string()));
        assert!(lines.contains(&"Strategy D: CentralDefense".to_string()));
    }

    #[test]
    fn test_render_iteration_is_one_based() {
        let lines = render_event(&RunEvent::IterationStarted { iteration: 0 });
        assert_eq!(lines[1], "ITERATION 1");
    }

    #[test]
    fn test_render_config_only_key_parameters() {
        let config: BalanceConfig = [
            ("starting_gold".to_string(), Number::from(100)),
            ("tower_min_distance".to_string(), Number::from(2)),
        ]
        .into_iter()
        .collect();

        let lines = render_event(&RunEvent::Config(&config));
        assert_eq!(lines, vec!["Current Config:", "  starting_gold: 100"]);
    }

    #[test]
    fn test_render_results() {
        let mut strategies = StrategyMap::new();
        strategies.insert(
            "a".to_string(),
            StrategyMetrics {
                name: "DualTower".to_string(),
                win_rate: 0.753,
                avg_shrine_hp: 61.25,
                avg_gold: 12.0,
                avg_killed: 40.4,
                avg_leaked: 2.6,
            },
        );
        let results = SimulationResults {
            strategies,
            ..SimulationResults::default()
        };

        let lines = render_event(&RunEvent::Results(&results));
        assert_eq!(lines[1], "  Strategy A (DualTower):");
        assert_eq!(lines[2], "    Win rate: 75.3%");
        assert_eq!(lines[5], "    Killed/Leaked: 40/3");
    }

    #[test]
    fn test_render_recommendation_skips_null_changes() {
        let mut rec = Recommendation {
            analysis: "Too easy".to_string(),
            confidence: 80.0,
            ..Recommendation::default()
        };
        rec.changes.insert("grunt_hp".to_string(), Some(Number::from(60)));
        rec.changes.insert("archer_cost".to_string(), None);

        let lines = render_event(&RunEvent::Recommendation(&rec));
        assert!(lines.contains(&"  Best strategy: ?".to_string()));
        assert!(lines.contains(&"  Reasoning: No reasoning".to_string()));
        assert!(lines.contains(&"  Confidence: 80%".to_string()));
        assert!(lines.contains(&"    grunt_hp: 60".to_string()));
        assert!(!lines.iter().any(|line| line.contains("archer_cost")));
    }

    #[test]
    fn test_render_terminal_states() {
        let success = render_event(&RunEvent::Stopped {
            iteration: 2,
            state: &LoopState::Succeeded,
        });
        assert!(success.contains(&"SUCCESS! Targets met after 3 iterations".to_string()));

        let failed = render_event(&RunEvent::Stopped {
            iteration: 0,
            state: &LoopState::Failed(FailureCause {
                kind: FailureKind::Simulation,
                message: "godot exited".to_string(),
            }),
        });
        assert!(failed.iter().any(|line| line.contains("godot exited")));
    }
}
