use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::application::commands::handlers::*;
use crate::application::queries::ConsistencyQueries;
use crate::application::services::ConfigService;
use crate::presentation::error::CommandError;
use crate::presentation::state::{AppState, CommandHandlers, Queries, Runtime};
use moodtrack_domain::check_in::{CheckInRepository, OfflineQueue};
use moodtrack_domain::consistency::ConsistencyCalculator;
use moodtrack_domain::shared::DomainError;
use moodtrack_infrastructure::logging;
use moodtrack_infrastructure::persistence::{
    repositories::{SqliteCheckInRepository, UnavailableCheckInRepository},
    Database,
};
use moodtrack_infrastructure::queue::JsonFileOfflineQueue;

/// Load configuration from `path`, or from the platform config dir
pub fn load_config(path: Option<PathBuf>) -> Result<ConfigService, CommandError> {
    let path = match path {
        Some(path) => path,
        None => ConfigService::default_config_path().ok_or_else(|| {
            CommandError::infrastructure("No config directory on this platform, pass --config")
        })?,
    };
    Ok(ConfigService::load(path)?)
}

pub fn init_logging(config: &ConfigService) {
    let level = config.get_log_level().as_str();
    let log_dir = config.log_dir();

    if let Err(e) = logging::init_logger(&log_dir, level) {
        logging::init_fallback_logger(level);
        warn!(
            "File logging unavailable in {}: {}, logging to stderr",
            log_dir.display(),
            e
        );
    }

    if let Some(warning) = config.load_warning() {
        warn!("{}", warning);
    }
}

async fn open_database(path: &Path) -> Result<Database, DomainError> {
    let path_str = path.to_str().ok_or_else(|| {
        DomainError::Infrastructure(format!(
            "Database path is not valid UTF-8: {}",
            path.display()
        ))
    })?;

    info!("🔌 Connecting to database {}", path_str);
    let started_at = Instant::now();
    let database = Database::new(path_str).await?;
    info!(
        "✓ Database connection established ({}ms)",
        started_at.elapsed().as_millis()
    );

    let started_at = Instant::now();
    database.run_migrations().await?;
    info!(
        "✓ Migrations completed ({}ms)",
        started_at.elapsed().as_millis()
    );

    Ok(database)
}

/// Wire repositories, queries and handlers from configuration.
///
/// When the database cannot be opened and `queue_on_failure` is set, the
/// state is built around a store that rejects every call, so recording
/// falls back to the offline queue and reads report the outage.
pub async fn build_app_state(
    config: &ConfigService,
    today: Option<NaiveDate>,
) -> Result<AppState, DomainError> {
    let settings = config.config();
    let policy = settings.consistency_policy()?;

    let (db, check_in_repo) = match open_database(&config.database_path()).await {
        Ok(database) => {
            let database = Arc::new(database);
            let repo = Arc::new(SqliteCheckInRepository::new(database.shared_pool()))
                as Arc<dyn CheckInRepository>;
            (Some(database), repo)
        }
        Err(e) if settings.queue_on_failure && e.is_recoverable() => {
            warn!("Database unavailable, check-ins will be queued: {}", e);
            let repo = Arc::new(UnavailableCheckInRepository::new(e.message()))
                as Arc<dyn CheckInRepository>;
            (None, repo)
        }
        Err(e) => return Err(e),
    };

    let queue_path = config.offline_queue_path();
    info!("Offline queue: {}", queue_path.display());
    let offline_queue = Arc::new(JsonFileOfflineQueue::new(queue_path)) as Arc<dyn OfflineQueue>;

    let mut consistency = ConsistencyQueries::new(
        check_in_repo.clone(),
        ConsistencyCalculator::new(policy),
    );
    if let Some(today) = today {
        consistency = consistency.with_today(today);
    }

    let command_handlers = CommandHandlers {
        record_check_in: Arc::new(RecordCheckInCommandHandler::new(
            check_in_repo.clone(),
            offline_queue.clone(),
            settings.queue_on_failure,
        )),
        sync_offline_queue: Arc::new(SyncOfflineQueueCommandHandler::new(
            check_in_repo,
            offline_queue,
        )),
    };

    Ok(AppState {
        runtime: Runtime { db },
        queries: Queries {
            consistency: Arc::new(consistency),
        },
        command_handlers,
    })
}
