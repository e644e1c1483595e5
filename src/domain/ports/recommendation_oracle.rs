use async_trait::async_trait;

use crate::domain::errors::TuningResult;
use crate::domain::models::{BalanceConfig, Recommendation, SimulationResults, TargetSpec};

/// Inputs for one analysis call.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest<'a> {
    pub config: &'a BalanceConfig,
    pub results: &'a SimulationResults,
    pub targets: &'a TargetSpec,
    pub goal: &'a str,
    /// Simulations per strategy behind `results`
    pub runs: u32,
}

/// Produces balance recommendations.
///
/// A reply that cannot be parsed is not an error: implementations return
/// [`Recommendation::sentinel`]. Transport or API failures are
/// [`TuningError::Analysis`](crate::domain::TuningError::Analysis).
#[async_trait]
pub trait RecommendationOracle: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest<'_>) -> TuningResult<Recommendation>;
}
