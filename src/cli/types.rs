//! CLI type definitions
//!
//! This module contains the clap structure that defines the CLI interface.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "balance-tuner")]
#[command(about = "Automated balance tuning for Bastion's Last Stand", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Balance goal in plain language, e.g. "Make the game harder"
    #[arg(short, long)]
    pub goal: String,

    /// Stop after this many iterations
    #[arg(short = 'n', long, default_value_t = 10)]
    pub max_iterations: u32,

    /// Simulation runs per strategy per iteration
    #[arg(short, long, default_value_t = 1000)]
    pub runs: u32,

    /// Analyze only; never write recommended changes
    #[arg(long)]
    pub dry_run: bool,

    /// Game project directory (overrides `simulator.project_path`)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Tool settings file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output the final report in JSON format
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["balance-tuner", "--goal", "Harder"]).unwrap();
        assert_eq!(cli.goal, "Harder");
        assert_eq!(cli.max_iterations, 10);
        assert_eq!(cli.runs, 1000);
        assert!(!cli.dry_run);
        assert!(!cli.json);
        assert!(cli.project.is_none());
    }

    #[test]
    fn test_goal_is_required() {
        assert!(Cli::try_parse_from(["balance-tuner", "--runs", "10"]).is_err());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "balance-tuner",
            "-g",
            "Easier",
            "--max-iterations",
            "3",
            "--runs",
            "50",
            "--dry-run",
            "--project",
            "../game",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.max_iterations, 3);
        assert_eq!(cli.runs, 50);
        assert!(cli.dry_run);
        assert!(cli.json);
        assert_eq!(cli.project, Some(PathBuf::from("../game")));
    }
}
