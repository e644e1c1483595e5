//! Target satisfaction for a simulation batch.
//!
//! Only the best strategy (highest win rate) is judged. There is no average
//! across strategies.

use crate::domain::models::{SimulationResults, StrategyMetrics, TargetSpec};

/// Outcome of checking one batch against the targets.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetEvaluation<'a> {
    /// Identifier and metrics of the best strategy, if there was any
    pub best: Option<(&'a str, &'a StrategyMetrics)>,

    /// Target names the best strategy misses, in display order
    pub off_target: Vec<&'static str>,
}

impl TargetEvaluation<'_> {
    /// All targets met. An empty batch never satisfies.
    pub fn is_satisfied(&self) -> bool {
        self.best.is_some() && self.off_target.is_empty()
    }
}

/// Strategy with the highest win rate.
///
/// Single linear scan keeping the first strict improvement, so ties go to
/// the strategy that comes first in iteration order.
pub fn select_best(results: &SimulationResults) -> Option<(&str, &StrategyMetrics)> {
    let mut best: Option<(&str, &StrategyMetrics)> = None;

    for (id, metrics) in &results.strategies {
        match best {
            Some((_, current)) if metrics.win_rate <= current.win_rate => {}
            _ => best = Some((id.as_str(), metrics)),
        }
    }

    best
}

/// Check the best strategy of `results` against `targets`.
pub fn evaluate<'a>(results: &'a SimulationResults, targets: &TargetSpec) -> TargetEvaluation<'a> {
    let Some(best) = select_best(results) else {
        return TargetEvaluation {
            best: None,
            off_target: targets.entries().iter().map(|(name, _)| *name).collect(),
        };
    };

    let metrics = best.1;
    let checks = [
        ("win_rate", targets.win_rate.contains(metrics.win_rate)),
        ("shrine_hp", targets.shrine_hp.contains(metrics.avg_shrine_hp)),
        ("gold_remaining", targets.gold_remaining.contains(metrics.avg_gold)),
        ("enemies_leaked", targets.enemies_leaked.contains(metrics.avg_leaked)),
    ];

    TargetEvaluation {
        best: Some(best),
        off_target: checks
            .iter()
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| *name)
            .collect(),
    }
}

/// Whether the best strategy of `results` meets every target.
pub fn targets_met(results: &SimulationResults, targets: &TargetSpec) -> bool {
    evaluate(results, targets).is_satisfied()
}
