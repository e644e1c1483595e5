//! Balance Tuner CLI entry point.

use clap::Parser;

use balance_tuner::cli::{commands, handle_error, Cli};
use balance_tuner::infrastructure::config::ConfigLoader;
use balance_tuner::infrastructure::logging::{LogConfig, LoggerImpl};
use balance_tuner::LoopState;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    let settings = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => handle_error(&err, json),
    };

    let logger = match LoggerImpl::init(&LogConfig::from(&settings.logging)) {
        Ok(logger) => logger,
        Err(err) => handle_error(&err, json),
    };

    let result = commands::tune::execute(cli, settings).await;
    // Flush the file appender before exiting
    drop(logger);

    match result {
        Ok(report) if matches!(report.outcome, LoopState::Failed(_)) => std::process::exit(1),
        Ok(_) => {}
        Err(err) => handle_error(&err, json),
    }
}
