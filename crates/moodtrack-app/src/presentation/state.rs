use std::sync::Arc;

use crate::application::commands::handlers::*;
use crate::application::queries::ConsistencyQueries;
use moodtrack_infrastructure::persistence::Database;

/// Command handlers container
pub struct CommandHandlers {
    pub record_check_in: Arc<RecordCheckInCommandHandler>,
    pub sync_offline_queue: Arc<SyncOfflineQueueCommandHandler>,
}

pub struct Runtime {
    /// `None` when the database could not be opened and writes go to the queue
    pub db: Option<Arc<Database>>,
}

pub struct Queries {
    pub consistency: Arc<ConsistencyQueries>,
}

pub struct AppState {
    pub runtime: Runtime,
    pub queries: Queries,
    pub command_handlers: CommandHandlers,
}

impl AppState {
    pub fn is_offline(&self) -> bool {
        self.runtime.db.is_none()
    }

    pub async fn shutdown(&self) {
        if let Some(db) = &self.runtime.db {
            db.close().await;
        }
    }
}
