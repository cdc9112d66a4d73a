use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::application::commands::check_in_commands::*;
use crate::application::commands::command_handler::CommandHandler;
use crate::application::dtos::CheckInDto;
use moodtrack_domain::check_in::{CheckIn, CheckInKind, CheckInRepository, OfflineQueue};
use moodtrack_domain::shared::{DomainError, SubjectId};

/// Record check-in command handler
pub struct RecordCheckInCommandHandler {
    check_in_repo: Arc<dyn CheckInRepository>,
    offline_queue: Arc<dyn OfflineQueue>,
    queue_on_failure: bool,
}

impl RecordCheckInCommandHandler {
    pub fn new(
        check_in_repo: Arc<dyn CheckInRepository>,
        offline_queue: Arc<dyn OfflineQueue>,
        queue_on_failure: bool,
    ) -> Self {
        Self {
            check_in_repo,
            offline_queue,
            queue_on_failure,
        }
    }
}

#[async_trait]
impl CommandHandler<RecordCheckInCommand> for RecordCheckInCommandHandler {
    type Result = RecordCheckInResult;

    async fn handle(&self, cmd: RecordCheckInCommand) -> Result<Self::Result, DomainError> {
        info!(
            "Handling RecordCheckInCommand subject={} kind={}",
            cmd.subject_id, cmd.kind
        );

        let kind: CheckInKind = cmd.kind.parse()?;
        let check_in = CheckIn::new(
            SubjectId::from_string(cmd.subject_id.trim()),
            kind,
            cmd.value,
            cmd.note,
            cmd.recorded_at.unwrap_or_else(Utc::now),
        )?;

        match self.check_in_repo.save(&check_in).await {
            Ok(()) => {
                info!(
                    "Check-in {} stored for subject {}",
                    check_in.id(),
                    check_in.subject_id()
                );

                // The check-in is stored; a failed count must not turn this into an error
                let subject_total = match self
                    .check_in_repo
                    .count_by_subject(check_in.subject_id())
                    .await
                {
                    Ok(total) => Some(total),
                    Err(e) => {
                        warn!(
                            "Counting check-ins for subject {} failed: {}",
                            check_in.subject_id(),
                            e
                        );
                        None
                    }
                };

                Ok(RecordCheckInResult {
                    check_in: CheckInDto::from(&check_in),
                    queued: false,
                    subject_total,
                })
            }
            // Only transient failures are worth replaying later
            Err(e) if self.queue_on_failure && e.is_recoverable() => {
                warn!(
                    "Saving check-in {} failed, queueing for later sync: {}",
                    check_in.id(),
                    e
                );
                let dto = CheckInDto::from(&check_in);
                self.offline_queue.enqueue(check_in).await?;

                Ok(RecordCheckInResult {
                    check_in: dto,
                    queued: true,
                    subject_total: None,
                })
            }
            Err(e) => Err(e),
        }
    }
}
