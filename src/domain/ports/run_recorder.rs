use async_trait::async_trait;
use serde_json::Number;
use std::collections::BTreeMap;

use crate::domain::errors::TuningResult;
use crate::domain::models::{
    BalanceConfig, IterationRecord, LoopState, Recommendation, SimulationResults, TargetSpec,
    TuningReport,
};

/// Notable moments of a run, in the order the loop emits them.
#[derive(Debug, Clone, Copy)]
pub enum RunEvent<'a> {
    Started {
        goal: &'a str,
        targets: &'a TargetSpec,
    },
    IterationStarted {
        iteration: u32,
    },
    Config(&'a BalanceConfig),
    Results(&'a SimulationResults),
    Recommendation(&'a Recommendation),
    ChangesApplied(&'a BTreeMap<String, Number>),
    /// Analyze-only mode: changes were not written
    DryRun,
    /// No applicable changes this iteration
    Stagnation {
        iteration: u32,
        consecutive: u32,
    },
    Stopped {
        iteration: u32,
        state: &'a LoopState,
    },
}

/// Audit trail of a tuning run. Not consulted by the loop's decisions.
#[async_trait]
pub trait RunRecorder: Send + Sync {
    async fn event(&self, event: RunEvent<'_>) -> TuningResult<()>;

    /// Append one iteration snapshot.
    async fn record_iteration(&self, record: &IterationRecord) -> TuningResult<()>;

    /// Persist the final summary.
    async fn finish(&self, report: &TuningReport) -> TuningResult<()>;
}
