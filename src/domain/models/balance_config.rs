use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;

/// Proposed parameter updates keyed by parameter name.
///
/// `None` means "no change" and is never applied.
pub type ParameterChanges = BTreeMap<String, Option<Number>>;

/// Canonical default balance parameters for Bastion's Last Stand.
const DEFAULT_PARAMETERS: &[(&str, u64)] = &[
    // Economy
    ("starting_gold", 120),
    ("wall_cost", 10),
    ("sell_rate_percent", 90),
    // Archer tower
    ("archer_cost", 80),
    ("archer_damage", 15000),
    ("archer_attack_speed_ms", 800),
    ("archer_range", 5),
    // Enemies
    ("grunt_hp", 60),
    ("grunt_speed", 1000),
    ("grunt_gold", 5),
    ("runner_hp", 40),
    ("runner_speed", 2000),
    ("runner_gold", 8),
    // Shrine
    ("shrine_hp", 100),
    ("enemy_shrine_damage", 1),
    // Waves
    ("wave_spawn_interval_base_ms", 800),
    ("wave_spawn_interval_rush_ms", 300),
    ("wave_1_grunts", 5),
    ("wave_2_grunts", 8),
    ("wave_3_grunts", 10),
    ("wave_4_grunts", 12),
    ("wave_5_grunts", 15),
    ("wave_6_grunts", 12),
    ("wave_6_runners", 3),
    ("wave_7_grunts", 10),
    ("wave_7_runners", 6),
    ("wave_8_runners", 25),
    ("wave_9_grunts", 15),
    ("wave_9_runners", 8),
    ("wave_10_grunts", 18),
    ("wave_10_runners", 10),
];

/// Flat balance configuration document: parameter name to numeric value.
///
/// Keys iterate (and serialize) in sorted order. Integer values stay integers
/// through a read/write cycle because values are kept as JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceConfig {
    parameters: BTreeMap<String, Number>,
}

impl BalanceConfig {
    /// Empty document. Mostly useful in tests; the loop always starts from
    /// a persisted document or [`BalanceConfig::defaults`].
    pub fn new() -> Self {
        Self {
            parameters: BTreeMap::new(),
        }
    }

    /// The canonical default document.
    pub fn defaults() -> Self {
        DEFAULT_PARAMETERS
            .iter()
            .map(|(key, value)| ((*key).to_string(), Number::from(*value)))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&Number> {
        self.parameters.get(key)
    }

    /// Value of `key` as a float, if present.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.parameters.get(key).and_then(Number::as_f64)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.parameters.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Number)> {
        self.parameters.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.parameters.keys()
    }

    /// Merge `changes` into this document.
    ///
    /// Only keys already present are overwritten, and only with non-null
    /// values. The key set never changes. Returns the updates that were
    /// actually applied.
    pub fn merge(&mut self, changes: &ParameterChanges) -> BTreeMap<String, Number> {
        let mut applied = BTreeMap::new();

        for (key, value) in changes {
            let Some(value) = value else {
                continue;
            };
            if let Some(slot) = self.parameters.get_mut(key) {
                slot.clone_from(value);
                applied.insert(key.clone(), value.clone());
            }
        }

        applied
    }
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl FromIterator<(String, Number)> for BalanceConfig {
    fn from_iter<I: IntoIterator<Item = (String, Number)>>(iter: I) -> Self {
        Self {
            parameters: iter.into_iter().collect(),
        }
    }
}
