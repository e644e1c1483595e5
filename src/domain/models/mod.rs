pub mod balance_config;
pub mod recommendation;
pub mod run;
pub mod settings;
pub mod simulation;
pub mod targets;

pub use balance_config::{BalanceConfig, ParameterChanges};
pub use recommendation::Recommendation;
pub use run::{FailureCause, FailureKind, IterationRecord, LoopState, TuningReport};
pub use settings::{
    AnalystSettings, LoggingConfig, RecordingSettings, Settings, SimulatorSettings,
    TuningSettings,
};
pub use simulation::{ParameterBound, SimulationResults, StrategyMap, StrategyMetrics};
pub use targets::{TargetRange, TargetSpec};
