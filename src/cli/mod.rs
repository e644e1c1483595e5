//! Command-line interface
//!
//! - `types`: clap definitions
//! - `commands`: the tuning run
//! - `output`: tables, spinners and JSON output

pub mod commands;
pub mod output;
pub mod types;

pub use types::Cli;

use console::style;

/// Print a top-level error and exit with status 1
pub fn handle_error(err: &anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        println!(
            "{}",
            serde_json::json!({ "success": false, "error": err.to_string(), "causes": chain })
        );
    } else {
        eprintln!("{} {err}", style("Error:").red().bold());
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
    }
    std::process::exit(1);
}
