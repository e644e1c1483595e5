use async_trait::async_trait;

use crate::domain::errors::TuningResult;
use crate::domain::models::{BalanceConfig, SimulationResults};

/// Runs a batch of game simulations.
///
/// Any process, transport, or output failure is reported as
/// [`TuningError::Simulation`](crate::domain::TuningError::Simulation). The
/// loop never retries it.
#[async_trait]
pub trait SimulationOracle: Send + Sync {
    /// Simulate `runs` games per strategy against `config`.
    ///
    /// File-backed simulators read the persisted document instead of
    /// `config`; the two are the same by the time the loop calls this.
    async fn run(&self, config: &BalanceConfig, runs: u32) -> TuningResult<SimulationResults>;
}
