use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Metrics per strategy identifier, in the order the simulator reported them.
pub type StrategyMap = IndexMap<String, StrategyMetrics>;

/// Aggregate metrics for one strategy over a simulation batch.
///
/// Missing numeric fields read as zero except `avg_leaked`, which reads as
/// unbounded so that a strategy with no leak data never passes the leak target.
/// An unbounded leak count is written as `null` and reads back as unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyMetrics {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub win_rate: f64,

    #[serde(default)]
    pub avg_shrine_hp: f64,

    #[serde(default)]
    pub avg_gold: f64,

    #[serde(default)]
    pub avg_killed: f64,

    #[serde(
        default = "unbounded",
        serialize_with = "serialize_leak_count",
        deserialize_with = "deserialize_leak_count"
    )]
    pub avg_leaked: f64,
}

const fn unbounded() -> f64 {
    f64::INFINITY
}

fn serialize_leak_count<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    Some(*value)
        .filter(|v| v.is_finite())
        .serialize(serializer)
}

fn deserialize_leak_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_else(unbounded))
}

/// Tunable range the simulator reports for a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterBound {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// One simulator pass: metrics per strategy identifier.
///
/// Strategies keep the simulator's output order, which is the order used to
/// break win-rate ties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    #[serde(default)]
    pub strategies: StrategyMap,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameter_bounds: BTreeMap<String, ParameterBound>,

    /// Best strategy as judged by the simulator itself (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_strategy: Option<String>,
}

impl SimulationResults {
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
