//! Service layer: the tuning loop and the pure logic it relies on.

pub mod board_renderer;
pub mod convergence_controller;
pub mod prompt_builder;
pub mod target_evaluator;

pub use convergence_controller::{ControllerConfig, ConvergenceController};
pub use prompt_builder::build_analysis_prompt;
pub use target_evaluator::{evaluate, select_best, targets_met, TargetEvaluation};
