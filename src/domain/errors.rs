//! Domain errors for the balance tuning loop.

use thiserror::Error;

/// Errors that end a tuning run.
///
/// None of these are retried. A malformed model reply is not an error here:
/// it is recovered into a sentinel [`Recommendation`](super::models::Recommendation)
/// by the analyst adapter.
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Analysis error: {0}")]
    Analysis(String),
}

impl TuningError {
    /// Short machine-readable name of the error kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Storage(_) => "storage_error",
            Self::Simulation(_) => "simulation_error",
            Self::Analysis(_) => "analysis_error",
        }
    }
}

pub type TuningResult<T> = Result<T, TuningError>;

impl From<std::io::Error> for TuningError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
