use std::process::ExitCode;

use clap::Parser;

mod command;
mod config;
mod logging;

use crate::config::{AppConfig, Cli};
use crate::logging::{LoggingConfig, init_logging};

/// Exit status for configuration, transport and other failures
const EXIT_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    // Keep the guard alive for the whole run so buffered file output is flushed
    let _logging_guard = match init_logging(&LoggingConfig::from_settings(&config.log)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match command::run(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
