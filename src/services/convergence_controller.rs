//! Convergence controller: the balance tuning loop.
//!
//! Each iteration reads the current configuration, simulates it, checks the
//! best strategy against the targets, and otherwise asks the analyst for
//! changes and merges them into the stored configuration. The loop stops on:
//!
//! - **Succeeded**: the best strategy meets every target (checked locally,
//!   before the analyst is called)
//! - **Converged**: the analyst says so, after that iteration's changes are
//!   committed
//! - **Stalled**: only with a configured stall limit
//! - **MaxIterationsReached**: iteration budget used up
//! - **Failed**: storage, simulation, or analysis error (never retried)

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Number;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::TuningResult;
use crate::domain::models::{
    BalanceConfig, FailureCause, IterationRecord, LoopState, Recommendation, TargetSpec,
    TuningReport,
};
use crate::domain::ports::{
    AnalysisRequest, ConfigStore, RecommendationOracle, RunEvent, RunRecorder, SimulationOracle,
};
use crate::services::target_evaluator;

/// Loop parameters for one tuning run.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Free-text goal handed to the analyst
    pub goal: String,

    pub targets: TargetSpec,

    /// Iteration budget
    pub max_iterations: u32,

    /// Simulations per strategy per iteration
    pub runs: u32,

    /// Compute recommendations but never write them
    pub analyze_only: bool,

    /// Consecutive no-change iterations before stopping as `Stalled`.
    /// `None` keeps iterating.
    pub stall_limit: Option<u32>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            goal: String::new(),
            targets: TargetSpec::default(),
            max_iterations: 10,
            runs: 1000,
            analyze_only: false,
            stall_limit: None,
        }
    }
}

/// What a finished iteration means for the loop.
enum Step {
    Continue { stagnant: bool },
    Stop(LoopState),
}

/// Mutable bookkeeping for a single run.
struct RunState {
    records: Vec<IterationRecord>,
    current_config: Option<BalanceConfig>,
    stagnant_streak: u32,
}

/// Drives the tuning loop over its four collaborators.
pub struct ConvergenceController {
    store: Arc<dyn ConfigStore>,
    simulator: Arc<dyn SimulationOracle>,
    analyst: Arc<dyn RecommendationOracle>,
    recorder: Arc<dyn RunRecorder>,
    config: ControllerConfig,
}

impl ConvergenceController {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        simulator: Arc<dyn SimulationOracle>,
        analyst: Arc<dyn RecommendationOracle>,
        recorder: Arc<dyn RunRecorder>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            store,
            simulator,
            analyst,
            recorder,
            config,
        }
    }

    /// Run the loop to a terminal state.
    ///
    /// Collaborator failures end the run in [`LoopState::Failed`] instead of
    /// surfacing as `Err`; the report still carries every record captured
    /// before the failure.
    #[instrument(skip(self), fields(goal = %self.config.goal, max_iterations = self.config.max_iterations))]
    pub async fn run(&self) -> TuningReport {
        let started_at = Utc::now();
        let mut state = RunState {
            records: Vec::new(),
            current_config: None,
            stagnant_streak: 0,
        };

        info!(
            runs = self.config.runs,
            analyze_only = self.config.analyze_only,
            stall_limit = ?self.config.stall_limit,
            "starting balance tuning run"
        );
        self.emit(RunEvent::Started {
            goal: &self.config.goal,
            targets: &self.config.targets,
        })
        .await;

        let mut iterations_run = 0;
        let mut outcome = LoopState::MaxIterationsReached;

        for iteration in 0..self.config.max_iterations {
            iterations_run = iteration + 1;
            debug!(state = %LoopState::Running { iteration }, "iteration started");

            let step = match self.run_iteration(iteration, &mut state).await {
                Ok(step) => step,
                Err(err) => {
                    warn!(iteration, error = %err, kind = err.kind(), "tuning run failed");
                    Step::Stop(LoopState::Failed(FailureCause::from(&err)))
                }
            };

            match step {
                Step::Stop(terminal) => {
                    outcome = terminal;
                    break;
                }
                Step::Continue { stagnant: true } => {
                    state.stagnant_streak += 1;
                    if self
                        .config
                        .stall_limit
                        .is_some_and(|limit| state.stagnant_streak >= limit)
                    {
                        outcome = LoopState::Stalled;
                        break;
                    }
                }
                Step::Continue { stagnant: false } => state.stagnant_streak = 0,
            }
        }

        info!(
            outcome = %outcome,
            iterations = iterations_run,
            records = state.records.len(),
            "balance tuning run finished"
        );
        self.emit(RunEvent::Stopped {
            iteration: iterations_run.saturating_sub(1),
            state: &outcome,
        })
        .await;

        let report = TuningReport {
            goal: self.config.goal.clone(),
            outcome,
            iterations_run,
            records: state.records,
            final_config: state.current_config,
            started_at,
            finished_at: Utc::now(),
        };

        if let Err(err) = self.recorder.finish(&report).await {
            warn!(error = %err, "failed to persist run summary");
        }

        report
    }

    #[instrument(skip(self, state))]
    async fn run_iteration(&self, iteration: u32, state: &mut RunState) -> TuningResult<Step> {
        self.emit(RunEvent::IterationStarted { iteration }).await;

        let config = self.store.read().await?;
        state.current_config = Some(config.clone());
        self.emit(RunEvent::Config(&config)).await;

        let results = self.simulator.run(&config, self.config.runs).await?;
        self.emit(RunEvent::Results(&results)).await;

        let evaluation = target_evaluator::evaluate(&results, &self.config.targets);
        if evaluation.is_satisfied() {
            info!(
                iteration,
                best = evaluation.best.map(|(id, _)| id),
                "all targets met"
            );
            let record =
                IterationRecord::new(iteration, config, &results, Recommendation::targets_met());
            self.append(state, record).await;
            return Ok(Step::Stop(LoopState::Succeeded));
        }
        debug!(
            iteration,
            best = evaluation.best.map(|(id, _)| id),
            off_target = ?evaluation.off_target,
            "targets not met"
        );

        let recommendation = self
            .analyst
            .analyze(AnalysisRequest {
                config: &config,
                results: &results,
                targets: &self.config.targets,
                goal: &self.config.goal,
                runs: self.config.runs,
            })
            .await?;
        self.emit(RunEvent::Recommendation(&recommendation)).await;

        let changes = recommendation.applicable_changes();
        let converged = recommendation.converged;
        if recommendation.is_sentinel() {
            warn!(iteration, error = ?recommendation.error, "analyst reply could not be parsed");
        }

        self.append(
            state,
            IterationRecord::new(iteration, config, &results, recommendation),
        )
        .await;

        if self.config.analyze_only {
            info!(iteration, proposed = changes.len(), "analyze-only: changes not applied");
            self.emit(RunEvent::DryRun).await;
        } else if !changes.is_empty() {
            let updated = self.store.apply_changes(&changes).await?;
            let applied: BTreeMap<String, Number> = changes
                .iter()
                .filter(|(key, _)| updated.contains_key(key.as_str()))
                .filter_map(|(key, value)| value.clone().map(|v| (key.clone(), v)))
                .collect();
            info!(iteration, applied = applied.len(), "changes applied");
            self.emit(RunEvent::ChangesApplied(&applied)).await;
            state.current_config = Some(updated);
        }

        if converged {
            info!(iteration, "analyst reports convergence");
            return Ok(Step::Stop(LoopState::Converged));
        }

        if changes.is_empty() {
            warn!(iteration, "no changes recommended, tuning may be stuck");
            self.emit(RunEvent::Stagnation {
                iteration,
                consecutive: state.stagnant_streak + 1,
            })
            .await;
            return Ok(Step::Continue { stagnant: true });
        }

        Ok(Step::Continue { stagnant: false })
    }

    async fn append(&self, state: &mut RunState, record: IterationRecord) {
        if let Err(err) = self.recorder.record_iteration(&record).await {
            warn!(iteration = record.iteration, error = %err, "failed to persist iteration record");
        }
        state.records.push(record);
    }

    async fn emit(&self, event: RunEvent<'_>) {
        if let Err(err) = self.recorder.event(event).await {
            warn!(error = %err, "failed to record run event");
        }
    }
}
