use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::application::commands::check_in_commands::*;
use crate::application::commands::command_handler::CommandHandler;
use crate::application::services::{ConfigService, LogLevel};
use crate::application::ResultExt;
use crate::presentation::cli::{ConfigAction, StoreCommand};
use crate::presentation::error::CommandError;
use crate::presentation::state::AppState;
use moodtrack_domain::check_in::CheckInKind;
use moodtrack_domain::consistency::ConsistencyCalculator;
use moodtrack_domain::shared::ErrorCode;

fn to_json<T: Serialize>(value: &T) -> Result<Value, CommandError> {
    Ok(serde_json::to_value(value).to_serialization_err()?)
}

fn parse_kind(kind: Option<String>) -> Result<Option<CheckInKind>, CommandError> {
    Ok(kind.map(|k| k.parse::<CheckInKind>()).transpose()?)
}

/// Run a subcommand that needs the check-in store
pub async fn execute(state: &AppState, command: StoreCommand) -> Result<Value, CommandError> {
    let queries = &state.queries.consistency;

    match command {
        StoreCommand::Record {
            subject,
            kind,
            value,
            note,
            at,
        } => {
            let result = state
                .command_handlers
                .record_check_in
                .handle(RecordCheckInCommand {
                    subject_id: subject,
                    kind,
                    value,
                    note,
                    recorded_at: at,
                })
                .await?;
            to_json(&result)
        }
        StoreCommand::Metrics { subject, kind } => {
            let metrics = queries.get_metrics(&subject, parse_kind(kind)?).await?;
            to_json(&metrics)
        }
        StoreCommand::Leaderboard { kind } => {
            let all = queries.get_all_metrics(parse_kind(kind)?).await?;
            to_json(&all)
        }
        StoreCommand::Calendar {
            subject,
            year,
            month,
            kind,
        } => {
            let today = queries.today();
            let calendar = queries
                .get_calendar(
                    &subject,
                    year.unwrap_or_else(|| today.year()),
                    month.unwrap_or_else(|| today.month()),
                    parse_kind(kind)?,
                )
                .await?;
            to_json(&calendar)
        }
        StoreCommand::Trend {
            subject,
            days,
            kind,
        } => {
            let trend = queries.get_trend(&subject, days, parse_kind(kind)?).await?;
            to_json(&trend)
        }
        StoreCommand::Day {
            subject,
            date,
            kind,
        } => {
            let day = queries
                .get_day_detail(&subject, &date, parse_kind(kind)?)
                .await?;
            to_json(&day)
        }
        StoreCommand::Sync => {
            if state.is_offline() {
                return Err(CommandError::infrastructure(
                    "Database unavailable, queued check-ins were left in place",
                ));
            }
            let result = state
                .command_handlers
                .sync_offline_queue
                .handle(SyncOfflineQueueCommand)
                .await?;
            to_json(&result)
        }
    }
}

async fn read_payload(input: Option<&Path>) -> Result<String, CommandError> {
    match input.filter(|p| p.as_os_str() != "-") {
        Some(path) => {
            if !path.exists() {
                return Err(CommandError::not_found(format!(
                    "Input file {} does not exist",
                    path.display()
                )));
            }
            Ok(tokio::fs::read_to_string(path).await.to_infra_err()?)
        }
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .to_infra_err()?;
            Ok(buffer)
        }
    }
}

/// Metrics over a JSON array of `{timestamp, value}` records
pub async fn compute(
    config: &ConfigService,
    input: Option<PathBuf>,
    today: Option<NaiveDate>,
) -> Result<Value, CommandError> {
    let raw = read_payload(input.as_deref()).await?;
    let payload: Value = serde_json::from_str(&raw).map_err(|e| {
        CommandError::from_code(
            ErrorCode::InvalidInput,
            format!("Input is not valid JSON: {}", e),
        )
    })?;

    let calculator = ConsistencyCalculator::new(config.config().consistency_policy()?);
    let today = today.unwrap_or_else(|| calculator.policy().today());
    let metrics = calculator.calculate_json(&payload, today)?;

    info!(
        "Computed metrics over {} record(s) as of {}",
        payload.as_array().map_or(0, Vec::len),
        today
    );
    to_json(&metrics)
}

pub fn config(config: &mut ConfigService, action: ConfigAction) -> Result<Value, CommandError> {
    match action {
        ConfigAction::Show => Ok(json!({
            "configPath": config.config_path().display().to_string(),
            "databasePath": config.database_path().display().to_string(),
            "offlineQueuePath": config.offline_queue_path().display().to_string(),
            "logDir": config.log_dir().display().to_string(),
            "config": to_json(config.config())?,
        })),
        ConfigAction::SetLogLevel { level } => {
            let level: LogLevel = level.parse()?;
            config.set_log_level(level)?;
            Ok(json!({
                "logLevel": level.as_str(),
                "configPath": config.config_path().display().to_string(),
            }))
        }
    }
}
