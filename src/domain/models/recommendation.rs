use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

use super::balance_config::ParameterChanges;

/// Structured balance recommendation returned by the analyst model.
///
/// Every field has a default so that partially filled replies still parse,
/// and a field of the wrong type reads as its default instead of rejecting
/// the whole reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default, deserialize_with = "or_default")]
    pub analysis: String,

    #[serde(default, deserialize_with = "or_default", skip_serializing_if = "Option::is_none")]
    pub best_strategy: Option<String>,

    #[serde(default, deserialize_with = "or_default")]
    pub off_target_metrics: Vec<String>,

    /// Parameter name to new value; anything that is not a number
    /// (null, "no change", ...) means "leave as is"
    #[serde(default, deserialize_with = "deserialize_changes")]
    pub changes: ParameterChanges,

    #[serde(default, deserialize_with = "or_default")]
    pub reasoning: String,

    #[serde(default, deserialize_with = "or_default")]
    pub expected_impact: String,

    /// 0-100
    #[serde(default, deserialize_with = "or_default")]
    pub confidence: f64,

    #[serde(default, deserialize_with = "or_default")]
    pub converged: bool,

    /// Set only on sentinel recommendations built from unparseable replies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl Recommendation {
    /// Stand-in for a model reply that could not be parsed.
    ///
    /// Carries no changes and never reports convergence, so the loop keeps
    /// going with the current configuration.
    pub fn sentinel(error: impl Into<String>, raw_response: impl Into<String>) -> Self {
        Self {
            analysis: "Failed to parse AI response".to_string(),
            error: Some(error.into()),
            raw_response: Some(raw_response.into()),
            confidence: 0.0,
            converged: false,
            ..Self::default()
        }
    }

    /// Record stored for an iteration that met every target without asking
    /// the model.
    pub fn targets_met() -> Self {
        Self {
            analysis: "All targets met by best strategy".to_string(),
            confidence: 100.0,
            converged: true,
            ..Self::default()
        }
    }

    pub const fn is_sentinel(&self) -> bool {
        self.error.is_some()
    }

    /// The non-null subset of `changes`.
    pub fn applicable_changes(&self) -> ParameterChanges {
        self.changes
            .iter()
            .filter(|(_, value)| value.is_some())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Any JSON value is accepted; one that does not fit `T` reads as the default.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

fn deserialize_changes<'de, D>(deserializer: D) -> Result<ParameterChanges, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, Value> = or_default(deserializer)?;

    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let number: Option<Number> = match value {
                Value::Number(n) => Some(n),
                _ => None,
            };
            (key, number)
        })
        .collect())
}
