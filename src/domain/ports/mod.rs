//! Port trait definitions (Hexagonal Architecture)
//!
//! The convergence loop only talks to its collaborators through these traits:
//! - ConfigStore: persisted balance configuration
//! - SimulationOracle: batch game simulations
//! - RecommendationOracle: model-backed balance analysis
//! - RunRecorder: audit trail of the run
//!
//! Infrastructure adapters implement them; tests substitute in-memory fakes.

pub mod config_store;
pub mod recommendation_oracle;
pub mod run_recorder;
pub mod simulation_oracle;

pub use config_store::ConfigStore;
pub use recommendation_oracle::{AnalysisRequest, RecommendationOracle};
pub use run_recorder::{RunEvent, RunRecorder};
pub use simulation_oracle::SimulationOracle;
