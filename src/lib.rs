//! Balance Tuner - automated balance tuning for Bastion's Last Stand
//!
//! Runs batches of headless game simulations, checks the best strategy
//! against target ranges, and asks a language model for parameter changes
//! until the targets are met or the iteration budget runs out.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, port traits and errors
//! - **Service Layer** (`services`): The convergence loop and its pure helpers
//! - **Infrastructure Layer** (`infrastructure`): Config file, Godot, Claude, run log
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use balance_tuner::services::{ControllerConfig, ConvergenceController};
//!
//! let controller = ConvergenceController::new(store, simulator, analyst, recorder, ControllerConfig {
//!     goal: "Make the game harder".to_string(),
//!     ..ControllerConfig::default()
//! });
//! let report = controller.run().await;
//! println!("{}", report.outcome);
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    BalanceConfig, IterationRecord, LoopState, Recommendation, Settings, SimulationResults,
    StrategyMetrics, TargetRange, TargetSpec, TuningReport,
};
pub use domain::ports::{ConfigStore, RecommendationOracle, RunRecorder, SimulationOracle};
pub use domain::{TuningError, TuningResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ControllerConfig, ConvergenceController};
