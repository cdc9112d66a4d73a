use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use crate::application::commands::check_in_commands::*;
use crate::application::commands::command_handler::CommandHandler;
use moodtrack_domain::check_in::{CheckInRepository, OfflineQueue};
use moodtrack_domain::shared::{CheckInId, DomainError};

/// Replays the offline queue into the repository.
///
/// The queue is read without being emptied. An entry is removed only after
/// it is stored, or when a constraint violation shows its id is already
/// stored (a previous sync got that far). Anything else stays queued in its
/// original position, so an interrupted sync loses nothing.
pub struct SyncOfflineQueueCommandHandler {
    check_in_repo: Arc<dyn CheckInRepository>,
    offline_queue: Arc<dyn OfflineQueue>,
}

impl SyncOfflineQueueCommandHandler {
    pub fn new(
        check_in_repo: Arc<dyn CheckInRepository>,
        offline_queue: Arc<dyn OfflineQueue>,
    ) -> Self {
        Self {
            check_in_repo,
            offline_queue,
        }
    }
}

#[async_trait]
impl CommandHandler<SyncOfflineQueueCommand> for SyncOfflineQueueCommandHandler {
    type Result = SyncOfflineQueueResult;

    async fn handle(&self, _cmd: SyncOfflineQueueCommand) -> Result<Self::Result, DomainError> {
        let pending = self.offline_queue.peek_all().await?;
        if pending.is_empty() {
            info!("Offline queue is empty, nothing to sync");
            return Ok(SyncOfflineQueueResult::default());
        }

        info!("Syncing {} queued check-ins", pending.len());

        let mut result = SyncOfflineQueueResult::default();
        let mut settled: Vec<CheckInId> = Vec::new();

        for check_in in &pending {
            match self.check_in_repo.save(check_in).await {
                Ok(()) => {
                    result.synced += 1;
                    settled.push(check_in.id().clone());
                }
                Err(DomainError::ConstraintViolation(msg)) => {
                    warn!("Queued check-in {} already stored: {}", check_in.id(), msg);
                    result.already_present += 1;
                    settled.push(check_in.id().clone());
                }
                Err(e) => {
                    warn!("Queued check-in {} still not stored: {}", check_in.id(), e);
                    result.failed += 1;
                }
            }
        }

        // On failure the stored entries stay queued; the next sync reports
        // them as already present
        if !settled.is_empty() {
            self.offline_queue.remove(&settled).await?;
        }
        result.remaining = self.offline_queue.len().await?;

        info!(
            "Offline sync done: synced={} already_present={} failed={} remaining={}",
            result.synced, result.already_present, result.failed, result.remaining
        );

        Ok(result)
    }
}
