//! Table output formatting for CLI commands
//!
//! Strategy metrics and applied changes as comfy-table tables, with in-range
//! metrics colored green and off-target ones red.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};

use crate::domain::models::{IterationRecord, StrategyMap, TargetRange, TargetSpec};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: console::colors_enabled(),
        }
    }

    pub const fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// One row per strategy, metrics checked against `targets`
    pub fn format_results(
        &self,
        strategies: &StrategyMap,
        targets: &TargetSpec,
    ) -> String {
        let mut table = Self::create_base_table();
        table.set_header(
            ["Strategy", "Win rate", "Shrine HP", "Gold", "Killed", "Leaked"]
                .into_iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

        for (id, metrics) in strategies {
            table.add_row(vec![
                Cell::new(format!("{} ({})", id.to_uppercase(), metrics.name)),
                self.metric_cell(
                    format!("{:.1}%", metrics.win_rate * 100.0),
                    metrics.win_rate,
                    targets.win_rate,
                ),
                self.metric_cell(
                    format!("{:.1}", metrics.avg_shrine_hp),
                    metrics.avg_shrine_hp,
                    targets.shrine_hp,
                ),
                self.metric_cell(
                    format!("{:.1}", metrics.avg_gold),
                    metrics.avg_gold,
                    targets.gold_remaining,
                ),
                Cell::new(format!("{:.0}", metrics.avg_killed)),
                self.metric_cell(
                    format!("{:.1}", metrics.avg_leaked),
                    metrics.avg_leaked,
                    targets.enemies_leaked,
                ),
            ]);
        }

        table.to_string()
    }

    /// Iteration history: best strategy, changes proposed, confidence
    pub fn format_history(&self, records: &[IterationRecord]) -> String {
        let mut table = Self::create_base_table();
        table.set_header(
            ["#", "Best", "Changes", "Confidence", "Converged"]
                .into_iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

        for record in records {
            let changes = record.recommendations.applicable_changes();
            let summary = if changes.is_empty() {
                "-".to_string()
            } else {
                changes
                    .iter()
                    .filter_map(|(key, value)| value.as_ref().map(|v| format!("{key}={v}")))
                    .collect::<Vec<_>>()
                    .join(", ")
            };

            let converged = if record.recommendations.converged {
                self.colored("yes", Color::Green)
            } else {
                Cell::new("no")
            };

            table.add_row(vec![
                Cell::new(record.iteration + 1),
                Cell::new(record.best_strategy.as_deref().unwrap_or("-")),
                Cell::new(summary),
                Cell::new(format!("{:.0}%", record.recommendations.confidence)),
                converged,
            ]);
        }

        table.to_string()
    }

    fn metric_cell(&self, text: String, value: f64, range: TargetRange) -> Cell {
        if range.contains(value) {
            self.colored(text, Color::Green)
        } else {
            self.colored(text, Color::Red)
        }
    }

    fn colored(&self, text: impl Into<String>, color: Color) -> Cell {
        let cell = Cell::new(text.into());
        if self.use_colors {
            cell.fg(color)
        } else {
            cell
        }
    }

    fn create_base_table() -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}
