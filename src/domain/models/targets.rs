use serde::{Deserialize, Serialize};

/// Inclusive numeric range `[min, max]`.
///
/// Serialized as a two-element array, e.g. `[0.95, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct TargetRange {
    pub min: f64,
    pub max: f64,
}

impl TargetRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Both bounds are inclusive.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl From<(f64, f64)> for TargetRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

impl From<TargetRange> for (f64, f64) {
    fn from(range: TargetRange) -> Self {
        (range.min, range.max)
    }
}

/// Acceptable ranges the best-performing strategy must hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TargetSpec {
    /// Fraction of runs won, 0.0-1.0
    #[serde(default = "default_win_rate")]
    pub win_rate: TargetRange,

    /// Average shrine HP left at the end of a run
    #[serde(default = "default_shrine_hp")]
    pub shrine_hp: TargetRange,

    /// Average unspent gold at the end of a run
    #[serde(default = "default_gold_remaining")]
    pub gold_remaining: TargetRange,

    /// Average enemies that reached the shrine
    #[serde(default = "default_enemies_leaked")]
    pub enemies_leaked: TargetRange,
}

const fn default_win_rate() -> TargetRange {
    TargetRange::new(0.95, 1.0)
}

const fn default_shrine_hp() -> TargetRange {
    TargetRange::new(85.0, 100.0)
}

const fn default_gold_remaining() -> TargetRange {
    TargetRange::new(0.0, 20.0)
}

const fn default_enemies_leaked() -> TargetRange {
    TargetRange::new(0.0, 5.0)
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self {
            win_rate: default_win_rate(),
            shrine_hp: default_shrine_hp(),
            gold_remaining: default_gold_remaining(),
            enemies_leaked: default_enemies_leaked(),
        }
    }
}

impl TargetSpec {
    /// Named ranges in display order.
    pub const fn entries(&self) -> [(&'static str, TargetRange); 4] {
        [
            ("win_rate", self.win_rate),
            ("shrine_hp", self.shrine_hp),
            ("gold_remaining", self.gold_remaining),
            ("enemies_leaked", self.enemies_leaked),
        ]
    }
}
