//! Analysis prompt for the balance analyst model.

use std::fmt::Write as _;

use crate::domain::models::{BalanceConfig, ParameterBound, SimulationResults, TargetSpec};
use crate::domain::ports::AnalysisRequest;

/// Parameters the model is allowed to touch, in prompt order.
pub const TUNABLE_PARAMETERS: &[&str] = &[
    "starting_gold",
    "wall_cost",
    "archer_cost",
    "archer_damage",
    "archer_attack_speed_ms",
    "archer_range",
    "grunt_hp",
    "grunt_speed",
    "grunt_gold",
    "runner_hp",
    "runner_speed",
    "runner_gold",
    "shrine_hp",
    "enemy_shrine_damage",
];

/// Render the full analysis prompt.
pub fn build_analysis_prompt(request: &AnalysisRequest<'_>) -> String {
    let mut prompt = String::with_capacity(4096);

    prompt.push_str(
        "You are a game balance analyst for a tower defense game called Bastion's Last Stand.\n\n",
    );

    let _ = writeln!(prompt, "## User's Optimization Goal\n{}\n", request.goal);

    prompt.push_str("## Current Configuration\n");
    prompt.push_str(&configuration_section(request.config));

    let _ = writeln!(
        prompt,
        "\n## Simulation Results ({} runs per strategy)",
        request.runs
    );
    prompt.push_str(&strategy_section(request.results));

    prompt.push_str("\n## Target Metrics (for best-performing strategy)\n");
    prompt.push_str(&targets_section(request.targets));

    prompt.push_str("\n## Parameter Bounds (what you can adjust)\n");
    prompt.push_str(&bounds_section(request.results));

    prompt.push_str(INSTRUCTIONS);
    prompt.push_str(&response_schema());

    prompt
}

fn value(config: &BalanceConfig, key: &str, fallback: f64) -> f64 {
    config.get_f64(key).unwrap_or(fallback)
}

fn configuration_section(config: &BalanceConfig) -> String {
    let mut out = String::new();
    let archer_damage = (value(config, "archer_damage", 15000.0) / 1000.0).floor();

    let _ = writeln!(out, "- Starting gold: {}", value(config, "starting_gold", 120.0));
    let _ = writeln!(out, "- Wall cost: {}g", value(config, "wall_cost", 10.0));
    let _ = writeln!(
        out,
        "- Archer tower: {}g cost, {} damage, {}ms attack speed, {} tile range",
        value(config, "archer_cost", 80.0),
        archer_damage,
        value(config, "archer_attack_speed_ms", 800.0),
        value(config, "archer_range", 5.0),
    );
    let _ = writeln!(
        out,
        "- Grunt enemy: {} HP, {:.1} tiles/sec speed, {}g reward",
        value(config, "grunt_hp", 60.0),
        value(config, "grunt_speed", 1000.0) / 1000.0,
        value(config, "grunt_gold", 5.0),
    );
    let _ = writeln!(
        out,
        "- Runner enemy: {} HP, {:.1} tiles/sec speed, {}g reward",
        value(config, "runner_hp", 40.0),
        value(config, "runner_speed", 2000.0) / 1000.0,
        value(config, "runner_gold", 8.0),
    );
    let _ = writeln!(out, "- Shrine: {} HP", value(config, "shrine_hp", 100.0));
    let _ = writeln!(
        out,
        "- Enemy shrine damage: {} per enemy",
        value(config, "enemy_shrine_damage", 1.0)
    );

    out
}

fn strategy_section(results: &SimulationResults) -> String {
    let mut out = String::new();

    for (id, s) in &results.strategies {
        let _ = write!(
            out,
            "\nStrategy {} ({}):\n\
             - Win rate: {:.1}%\n\
             - Avg shrine HP remaining: {:.1}/100\n\
             - Avg gold remaining: {:.1}\n\
             - Avg enemies killed: {:.0}\n\
             - Avg enemies leaked: {:.0}\n",
            id.to_uppercase(),
            s.name,
            s.win_rate * 100.0,
            s.avg_shrine_hp,
            s.avg_gold,
            s.avg_killed,
            s.avg_leaked,
        );
    }

    out
}

fn targets_section(targets: &TargetSpec) -> String {
    let shrine_mid = ((targets.shrine_hp.min + targets.shrine_hp.max) / 2.0).floor();

    format!(
        "- Win rate: {:.0}-{:.0}%\n\
         - Shrine HP remaining: {}-{} (target avg ~{})\n\
         - Gold remaining: {}-{} (tight economy)\n\
         - Enemies leaked: {}-{} (minimal)\n",
        targets.win_rate.min * 100.0,
        targets.win_rate.max * 100.0,
        targets.shrine_hp.min,
        targets.shrine_hp.max,
        shrine_mid,
        targets.gold_remaining.min,
        targets.gold_remaining.max,
        targets.enemies_leaked.min,
        targets.enemies_leaked.max,
    )
}

fn bounds_section(results: &SimulationResults) -> String {
    let mut out = String::new();

    for param in TUNABLE_PARAMETERS {
        if let Some(ParameterBound { min, max, step }) = results.parameter_bounds.get(*param) {
            let _ = writeln!(out, "- {param}: {min} to {max} (step {step})");
        }
    }

    out
}

const INSTRUCTIONS: &str = "
## Your Task
1. Analyze current results vs targets
2. Identify which metrics are off-target and why
3. Recommend specific config changes to move toward targets
4. Changes should be incremental (10-25% adjustments per iteration)
5. Consider game balance holistically - don't make one thing OP

## Key Insights
- Archer DPS = damage / attack_speed_ms * 1000 (attacks per second)
- Path length affects time enemies spend in tower range
- Current path is short (~4 tiles), enemies reach shrine quickly
- More gold means more towers/walls, but shouldn't be trivial
- Walls create longer paths, giving towers more time to shoot

Output ONLY valid JSON (no markdown, no explanation outside JSON):
";

fn response_schema() -> String {
    let changes = TUNABLE_PARAMETERS
        .iter()
        .map(|param| format!("    \"{param}\": <new_value or null if no change>"))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "{{\n  \"analysis\": \"2-3 sentence analysis of current state and main problems\",\n  \
         \"best_strategy\": \"a|b|c|d\",\n  \
         \"off_target_metrics\": [\"list of metrics not meeting targets\"],\n  \
         \"changes\": {{\n{changes}\n  }},\n  \
         \"reasoning\": \"Why these specific changes will help achieve the targets\",\n  \
         \"expected_impact\": \"What results we expect to see next iteration\",\n  \
         \"confidence\": <0-100>,\n  \
         \"converged\": <true if all targets are met by best strategy, false otherwise>\n}}"
    )
}
