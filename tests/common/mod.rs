//! Common test utilities for integration tests
//!
//! In-memory fakes for the four ports plus result fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Number;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use tempfile::TempDir;

use balance_tuner::domain::models::{
    BalanceConfig, IterationRecord, Recommendation, SimulationResults, StrategyMetrics,
    TuningReport,
};
use balance_tuner::domain::ports::{
    AnalysisRequest, ConfigStore, RecommendationOracle, RunEvent, RunRecorder, SimulationOracle,
};
use balance_tuner::{TuningError, TuningResult};

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn metrics(name: &str, win_rate: f64, shrine_hp: f64, gold: f64, leaked: f64) -> StrategyMetrics {
    StrategyMetrics {
        name: name.to_string(),
        win_rate,
        avg_shrine_hp: shrine_hp,
        avg_gold: gold,
        avg_killed: 40.0,
        avg_leaked: leaked,
    }
}

/// Best strategy `b` meets every default target
pub fn on_target_results() -> SimulationResults {
    results(vec![
        ("a", metrics("DualTower", 0.80, 70.0, 30.0, 8.0)),
        ("b", metrics("TripleTower", 0.97, 92.0, 10.0, 1.0)),
    ])
}

/// Every strategy wins too rarely
pub fn off_target_results() -> SimulationResults {
    results(vec![
        ("a", metrics("DualTower", 0.60, 50.0, 40.0, 9.0)),
        ("b", metrics("TripleTower", 0.70, 60.0, 35.0, 7.0)),
    ])
}

pub fn results(strategies: Vec<(&str, StrategyMetrics)>) -> SimulationResults {
    SimulationResults {
        strategies: strategies
            .into_iter()
            .map(|(id, m)| (id.to_string(), m))
            .collect(),
        ..SimulationResults::default()
    }
}

pub fn small_config() -> BalanceConfig {
    [
        ("starting_gold".to_string(), Number::from(100)),
        ("grunt_hp".to_string(), Number::from(50)),
    ]
    .into_iter()
    .collect()
}

pub fn recommend(changes: &[(&str, i64)], converged: bool) -> Recommendation {
    Recommendation {
        analysis: "test".to_string(),
        changes: changes
            .iter()
            .map(|(key, value)| ((*key).to_string(), Some(Number::from(*value))))
            .collect(),
        confidence: 50.0,
        converged,
        ..Recommendation::default()
    }
}

/// Config store held in memory
pub struct InMemoryConfigStore {
    pub config: Mutex<BalanceConfig>,
    pub fail_reads: bool,
    pub writes: Mutex<u32>,
}

impl InMemoryConfigStore {
    pub fn new(config: BalanceConfig) -> Self {
        Self {
            config: Mutex::new(config),
            fail_reads: false,
            writes: Mutex::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            ..Self::new(BalanceConfig::new())
        }
    }

    pub fn current(&self) -> BalanceConfig {
        self.config.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> u32 {
        *self.writes.lock().unwrap()
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn read(&self) -> TuningResult<BalanceConfig> {
        if self.fail_reads {
            return Err(TuningError::Storage("disk on fire".to_string()));
        }
        Ok(self.current())
    }

    async fn write(&self, config: &BalanceConfig) -> TuningResult<()> {
        *self.config.lock().unwrap() = config.clone();
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

/// Simulator replaying scripted outcomes, repeating `fallback` once they run out
pub struct ScriptedSimulator {
    script: Mutex<VecDeque<TuningResult<SimulationResults>>>,
    fallback: SimulationResults,
    pub seen_configs: Mutex<Vec<BalanceConfig>>,
}

impl ScriptedSimulator {
    pub fn repeating(results: SimulationResults) -> Self {
        Self::scripted(Vec::new(), results)
    }

    pub fn scripted(
        script: Vec<TuningResult<SimulationResults>>,
        fallback: SimulationResults,
    ) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            seen_configs: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen_configs.lock().unwrap().len()
    }

    pub fn configs(&self) -> Vec<BalanceConfig> {
        self.seen_configs.lock().unwrap().clone()
    }
}

#[async_trait]
impl SimulationOracle for ScriptedSimulator {
    async fn run(&self, config: &BalanceConfig, _runs: u32) -> TuningResult<SimulationResults> {
        self.seen_configs.lock().unwrap().push(config.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

/// Analyst replaying scripted recommendations, repeating `fallback` afterwards
pub struct ScriptedAnalyst {
    script: Mutex<VecDeque<TuningResult<Recommendation>>>,
    fallback: Recommendation,
    pub goals: Mutex<Vec<String>>,
}

impl ScriptedAnalyst {
    pub fn repeating(recommendation: Recommendation) -> Self {
        Self::scripted(Vec::new(), recommendation)
    }

    pub fn scripted(script: Vec<TuningResult<Recommendation>>, fallback: Recommendation) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            goals: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.goals.lock().unwrap().len()
    }
}

#[async_trait]
impl RecommendationOracle for ScriptedAnalyst {
    async fn analyze(&self, request: AnalysisRequest<'_>) -> TuningResult<Recommendation> {
        self.goals.lock().unwrap().push(request.goal.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

/// Recorder keeping everything in memory; can be told to fail every call
#[derive(Default)]
pub struct MemoryRecorder {
    pub events: Mutex<Vec<String>>,
    pub records: Mutex<Vec<IterationRecord>>,
    pub report: Mutex<Option<TuningReport>>,
    pub fail: bool,
}

impl MemoryRecorder {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn event_names(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn check(&self) -> TuningResult<()> {
        if self.fail {
            Err(TuningError::Storage("recorder unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

fn event_name(event: &RunEvent<'_>) -> String {
    match event {
        RunEvent::Started { .. } => "started".to_string(),
        RunEvent::IterationStarted { iteration } => format!("iteration:{iteration}"),
        RunEvent::Config(_) => "config".to_string(),
        RunEvent::Results(_) => "results".to_string(),
        RunEvent::Recommendation(_) => "recommendation".to_string(),
        RunEvent::ChangesApplied(changes) => format!("applied:{}", changes.len()),
        RunEvent::DryRun => "dry_run".to_string(),
        RunEvent::Stagnation { consecutive, .. } => format!("stagnation:{consecutive}"),
        RunEvent::Stopped { state, .. } => format!("stopped:{state}"),
    }
}

#[async_trait]
impl RunRecorder for MemoryRecorder {
    async fn event(&self, event: RunEvent<'_>) -> TuningResult<()> {
        self.check()?;
        self.events.lock().unwrap().push(event_name(&event));
        Ok(())
    }

    async fn record_iteration(&self, record: &IterationRecord) -> TuningResult<()> {
        self.check()?;
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn finish(&self, report: &TuningReport) -> TuningResult<()> {
        self.check()?;
        *self.report.lock().unwrap() = Some(report.clone());
        Ok(())
    }
}

/// Changes map helper for assertions
pub fn changes(pairs: &[(&str, i64)]) -> BTreeMap<String, Option<Number>> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), Some(Number::from(*value))))
        .collect()
}
