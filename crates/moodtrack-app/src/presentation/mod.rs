pub mod bootstrap;
pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use serde_json::Value;
use std::process::ExitCode;

use cli::{Cli, Commands};
use error::CommandError;

/// Run one CLI invocation. Results go to stdout as JSON, failures to
/// stderr as a JSON `CommandError`.
pub async fn run(cli: Cli) -> ExitCode {
    match dispatch(cli).await {
        Ok(value) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("Command failed: {}", err);
            let rendered = serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string());
            eprintln!("{}", rendered);
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> Result<Value, CommandError> {
    let mut config = bootstrap::load_config(cli.config)?;
    if let Some(db) = cli.db {
        config.override_database_path(db);
    }
    bootstrap::init_logging(&config);

    match cli.command {
        Commands::Config { action } => commands::config(&mut config, action),
        Commands::Compute { input } => commands::compute(&config, input, cli.today).await,
        Commands::Store(command) => {
            let state = bootstrap::build_app_state(&config, cli.today).await?;
            let result = commands::execute(&state, command).await;
            state.shutdown().await;
            result
        }
    }
}
