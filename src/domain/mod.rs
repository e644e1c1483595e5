//! Domain layer for the balance tuner
//!
//! Models, port traits, and errors. Nothing here talks to the filesystem,
//! processes, or the network.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{TuningError, TuningResult};
