use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::balance_config::BalanceConfig;
use super::recommendation::Recommendation;
use super::simulation::{SimulationResults, StrategyMap};
use crate::domain::errors::TuningError;

/// Snapshot of one loop iteration, kept for the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 0-based iteration index
    pub iteration: u32,

    /// Configuration the simulations ran against
    pub config: BalanceConfig,

    /// Metrics per strategy
    pub results: StrategyMap,

    /// Best strategy as reported by the simulator, if any
    pub best_strategy: Option<String>,

    pub recommendations: Recommendation,

    pub recorded_at: DateTime<Utc>,
}

impl IterationRecord {
    pub fn new(
        iteration: u32,
        config: BalanceConfig,
        results: &SimulationResults,
        recommendations: Recommendation,
    ) -> Self {
        Self {
            iteration,
            config,
            results: results.strategies.clone(),
            best_strategy: results.best_strategy.clone(),
            recommendations,
            recorded_at: Utc::now(),
        }
    }
}

/// Which collaborator failed when a run ends in [`LoopState::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Storage,
    Simulation,
    Analysis,
}

/// Cause attached to a failed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureCause {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&TuningError> for FailureCause {
    fn from(err: &TuningError) -> Self {
        let kind = match err {
            TuningError::Storage(_) => FailureKind::Storage,
            TuningError::Simulation(_) => FailureKind::Simulation,
            TuningError::Analysis(_) => FailureKind::Analysis,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// State of the convergence loop. Everything except `Running` is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoopState {
    Running { iteration: u32 },
    /// The best strategy met every target
    Succeeded,
    /// The analyst reported convergence
    Converged,
    /// Too many consecutive iterations without applicable changes
    Stalled,
    MaxIterationsReached,
    Failed(FailureCause),
}

impl LoopState {
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running { .. })
    }

    /// Targets met, or the analyst reported convergence
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Converged)
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running { iteration } => write!(f, "running (iteration {})", iteration + 1),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Converged => write!(f, "converged"),
            Self::Stalled => write!(f, "stalled"),
            Self::MaxIterationsReached => write!(f, "max iterations reached"),
            Self::Failed(cause) => write!(f, "failed: {}", cause.message),
        }
    }
}

/// Final result of a tuning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningReport {
    pub goal: String,

    pub outcome: LoopState,

    /// Iterations started, including one that failed part-way
    pub iterations_run: u32,

    pub records: Vec<IterationRecord>,

    /// Configuration in effect when the loop stopped
    pub final_config: Option<BalanceConfig>,

    pub started_at: DateTime<Utc>,

    pub finished_at: DateTime<Utc>,
}

impl TuningReport {
    /// Metrics of the last recorded iteration.
    pub fn last_results(&self) -> Option<&StrategyMap> {
        self.records.last().map(|record| &record.results)
    }
}
