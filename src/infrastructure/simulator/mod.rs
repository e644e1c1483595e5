//! Simulation oracle adapters.

pub mod godot;

pub use godot::{parse_simulation_output, GodotSimulator, GodotSimulatorConfig};
