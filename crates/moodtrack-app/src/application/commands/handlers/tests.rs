use chrono::TimeZone;
use mockall::mock;
use std::sync::Arc;

use crate::application::commands::check_in_commands::*;
use crate::application::commands::command_handler::CommandHandler;
use crate::application::commands::handlers::*;
use crate::application::test_support::*;
use moodtrack_domain::check_in::{CheckIn, CheckInKind, CheckInRepository, OfflineQueue};
use moodtrack_domain::shared::{CheckInId, DomainError, SubjectId};
use moodtrack_infrastructure::queue::InMemoryOfflineQueue;

/// Queue whose `remove` always fails, like a full disk under the queue file
struct ReadOnlyQueue {
    inner: Arc<InMemoryOfflineQueue>,
}

#[async_trait::async_trait]
impl OfflineQueue for ReadOnlyQueue {
    async fn enqueue(&self, check_in: CheckIn) -> Result<(), DomainError> {
        self.inner.enqueue(check_in).await
    }

    async fn peek_all(&self) -> Result<Vec<CheckIn>, DomainError> {
        self.inner.peek_all().await
    }

    async fn remove(&self, _ids: &[CheckInId]) -> Result<usize, DomainError> {
        Err(DomainError::Infrastructure("disk full".to_string()))
    }

    async fn len(&self) -> Result<usize, DomainError> {
        self.inner.len().await
    }
}

mock! {
    pub CheckInRepo {}

    #[async_trait::async_trait]
    impl CheckInRepository for CheckInRepo {
        async fn save(&self, check_in: &CheckIn) -> Result<(), DomainError>;
        async fn find_by_id(&self, id: &CheckInId) -> Result<Option<CheckIn>, DomainError>;
        async fn find_by_subject(
            &self,
            subject_id: &SubjectId,
            kind: Option<CheckInKind>,
        ) -> Result<Vec<CheckIn>, DomainError>;
        async fn list_subject_ids(&self) -> Result<Vec<SubjectId>, DomainError>;
        async fn count_by_subject(&self, subject_id: &SubjectId) -> Result<u64, DomainError>;
    }
}

fn record(subject: &str, kind: &str, value: Option<f64>, note: Option<&str>) -> RecordCheckInCommand {
    RecordCheckInCommand {
        subject_id: subject.to_string(),
        kind: kind.to_string(),
        value,
        note: note.map(str::to_string),
        recorded_at: Some(at(0)),
    }
}

fn unreachable_repo() -> MockCheckInRepo {
    let mut repo = MockCheckInRepo::new();
    repo.expect_save()
        .returning(|_| Err(DomainError::Timeout("Save check-in exceeded 10000ms".to_string())));
    repo.expect_count_by_subject().never();
    repo
}

// ============================================================
// RecordCheckInCommandHandler
// ============================================================

#[tokio::test]
async fn test_record_check_in_saves_and_counts() {
    let repo = Arc::new(InMemoryCheckInRepository::new());
    let queue = Arc::new(InMemoryOfflineQueue::new());
    let handler = RecordCheckInCommandHandler::new(repo.clone(), queue.clone(), true);

    let first = handler
        .handle(record("ana", "mood", Some(7.0), None))
        .await
        .unwrap();
    let second = handler
        .handle(record("ana", " Stress ", Some(3.0), Some("deadline")))
        .await
        .unwrap();

    assert!(!first.queued);
    assert_eq!(first.subject_total, Some(1));
    assert_eq!(second.subject_total, Some(2));
    assert_eq!(second.check_in.kind, "stress");
    assert_eq!(second.check_in.note.as_deref(), Some("deadline"));
    assert_eq!(repo.stored_ids().await.len(), 2);
    assert!(queue.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_record_check_in_succeeds_when_count_fails() {
    let mut repo = MockCheckInRepo::new();
    repo.expect_save().times(1).returning(|_| Ok(()));
    repo.expect_count_by_subject()
        .times(1)
        .returning(|_| Err(DomainError::Timeout("Count check-ins exceeded 10000ms".to_string())));
    let queue = Arc::new(InMemoryOfflineQueue::new());
    let handler = RecordCheckInCommandHandler::new(Arc::new(repo), queue.clone(), true);

    let result = handler
        .handle(record("ana", "mood", Some(6.0), None))
        .await
        .unwrap();

    assert!(!result.queued);
    assert_eq!(result.subject_total, None);
    assert!(queue.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_record_check_in_rejects_unknown_kind() {
    let handler = RecordCheckInCommandHandler::new(
        Arc::new(InMemoryCheckInRepository::new()),
        Arc::new(InMemoryOfflineQueue::new()),
        true,
    );

    let err = handler
        .handle(record("ana", "sleep", Some(7.0), None))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::InvalidInput(_)));
}

#[tokio::test]
async fn test_record_check_in_rejects_journal_without_note() {
    let repo = Arc::new(InMemoryCheckInRepository::new());
    let handler =
        RecordCheckInCommandHandler::new(repo.clone(), Arc::new(InMemoryOfflineQueue::new()), true);

    let err = handler
        .handle(record("ana", "journal", None, Some("   ")))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation(_)));
    assert!(repo.stored_ids().await.is_empty());
}

#[tokio::test]
async fn test_record_check_in_defaults_timestamp_to_now() {
    let handler = RecordCheckInCommandHandler::new(
        Arc::new(InMemoryCheckInRepository::new()),
        Arc::new(InMemoryOfflineQueue::new()),
        false,
    );
    let before = chrono::Utc::now();

    let mut cmd = record("ana", "mood", Some(5.0), None);
    cmd.recorded_at = None;
    let result = handler.handle(cmd).await.unwrap();

    let recorded = chrono::DateTime::parse_from_rfc3339(&result.check_in.recorded_at)
        .unwrap()
        .with_timezone(&chrono::Utc);
    assert!(recorded >= before);
}

#[tokio::test]
async fn test_record_check_in_queues_on_transient_failure() {
    let queue = Arc::new(InMemoryOfflineQueue::new());
    let handler = RecordCheckInCommandHandler::new(Arc::new(unreachable_repo()), queue.clone(), true);

    let result = handler
        .handle(record("ana", "mood", Some(6.0), None))
        .await
        .unwrap();

    assert!(result.queued);
    assert_eq!(result.subject_total, None);

    let queued = queue.peek_all().await.unwrap();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].id().as_str(), result.check_in.id);
}

#[tokio::test]
async fn test_record_check_in_fails_when_queueing_disabled() {
    let queue = Arc::new(InMemoryOfflineQueue::new());
    let handler =
        RecordCheckInCommandHandler::new(Arc::new(unreachable_repo()), queue.clone(), false);

    let err = handler
        .handle(record("ana", "mood", Some(6.0), None))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Timeout(_)));
    assert!(queue.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_record_check_in_does_not_queue_constraint_violation() {
    let mut repo = MockCheckInRepo::new();
    repo.expect_save()
        .times(1)
        .returning(|_| Err(DomainError::ConstraintViolation("duplicate id".to_string())));
    let queue = Arc::new(InMemoryOfflineQueue::new());
    let handler = RecordCheckInCommandHandler::new(Arc::new(repo), queue.clone(), true);

    let err = handler
        .handle(record("ana", "mood", Some(6.0), None))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::ConstraintViolation(_)));
    assert_eq!(queue.len().await.unwrap(), 0);
}

// ============================================================
// SyncOfflineQueueCommandHandler
// ============================================================

#[tokio::test]
async fn test_sync_empty_queue() {
    let mut repo = MockCheckInRepo::new();
    repo.expect_save().never();
    let handler =
        SyncOfflineQueueCommandHandler::new(Arc::new(repo), Arc::new(InMemoryOfflineQueue::new()));

    let result = handler.handle(SyncOfflineQueueCommand).await.unwrap();

    assert_eq!(result, SyncOfflineQueueResult::default());
}

#[tokio::test]
async fn test_sync_stores_everything_when_repository_is_back() {
    let repo = Arc::new(InMemoryCheckInRepository::new());
    let queue = Arc::new(InMemoryOfflineQueue::new());
    let queued = vec![mood("ana", 4.0, 2), mood("ana", 5.0, 1), mood("bo", 6.0, 0)];
    for check_in in &queued {
        queue.enqueue(check_in.clone()).await.unwrap();
    }

    let handler = SyncOfflineQueueCommandHandler::new(repo.clone(), queue.clone());
    let result = handler.handle(SyncOfflineQueueCommand).await.unwrap();

    assert_eq!(result.synced, 3);
    assert_eq!(result.failed, 0);
    assert_eq!(result.remaining, 0);

    let expected: Vec<_> = queued.iter().map(|c| c.id().clone()).collect();
    assert_eq!(repo.stored_ids().await, expected);
}

#[tokio::test]
async fn test_sync_keeps_failures_in_original_order() {
    let queue = Arc::new(InMemoryOfflineQueue::new());
    let first = mood("ana", 1.0, 3);
    let second = mood("ana", 2.0, 2);
    let third = mood("ana", 3.0, 1);
    for check_in in [&first, &second, &third] {
        queue.enqueue(check_in.clone()).await.unwrap();
    }

    // Only the middle one gets through
    let second_id = second.id().clone();
    let mut repo = MockCheckInRepo::new();
    repo.expect_save().times(3).returning(move |c| {
        if c.id() == &second_id {
            Ok(())
        } else {
            Err(DomainError::Repository("database is locked".to_string()))
        }
    });

    let handler = SyncOfflineQueueCommandHandler::new(Arc::new(repo), queue.clone());
    let result = handler.handle(SyncOfflineQueueCommand).await.unwrap();

    assert_eq!(result.synced, 1);
    assert_eq!(result.failed, 2);
    assert_eq!(result.remaining, 2);

    let left = queue.peek_all().await.unwrap();
    assert_eq!(left, vec![first, third]);
}

#[tokio::test]
async fn test_sync_drops_already_stored_check_ins() {
    let stored = mood("ana", 4.0, 1);
    let repo = Arc::new(InMemoryCheckInRepository::with(vec![stored.clone()]).await);
    let queue = Arc::new(InMemoryOfflineQueue::new());
    queue.enqueue(stored).await.unwrap();
    queue.enqueue(mood("ana", 5.0, 0)).await.unwrap();

    let handler = SyncOfflineQueueCommandHandler::new(repo.clone(), queue.clone());
    let result = handler.handle(SyncOfflineQueueCommand).await.unwrap();

    assert_eq!(result.synced, 1);
    assert_eq!(result.already_present, 1);
    assert_eq!(result.remaining, 0);
    assert_eq!(repo.stored_ids().await.len(), 2);
}

#[tokio::test]
async fn test_queued_check_in_keeps_its_identity_through_sync() {
    let queue = Arc::new(InMemoryOfflineQueue::new());
    let recorded_at = chrono::Utc.with_ymd_and_hms(2024, 6, 14, 8, 0, 0).unwrap();

    let record_handler =
        RecordCheckInCommandHandler::new(Arc::new(unreachable_repo()), queue.clone(), true);
    let mut cmd = record("ana", "mood", Some(8.0), None);
    cmd.recorded_at = Some(recorded_at);
    let recorded = record_handler.handle(cmd).await.unwrap();
    assert!(recorded.queued);

    let repo = Arc::new(InMemoryCheckInRepository::new());
    let sync_handler = SyncOfflineQueueCommandHandler::new(repo.clone(), queue.clone());
    sync_handler.handle(SyncOfflineQueueCommand).await.unwrap();

    let stored = repo
        .find_by_id(&CheckInId::from_string(&recorded.check_in.id))
        .await
        .unwrap()
        .expect("synced check-in");
    assert_eq!(stored.recorded_at(), recorded_at);
    assert_eq!(stored.value(), Some(8.0));
}

#[tokio::test]
async fn test_sync_leaves_unstored_check_ins_queued() {
    let inner = Arc::new(InMemoryOfflineQueue::new());
    let pending = mood("ana", 4.0, 1);
    inner.enqueue(pending.clone()).await.unwrap();
    let queue = Arc::new(ReadOnlyQueue {
        inner: inner.clone(),
    });

    let handler = SyncOfflineQueueCommandHandler::new(Arc::new(unreachable_repo()), queue);
    let result = handler.handle(SyncOfflineQueueCommand).await.unwrap();

    assert_eq!(result.failed, 1);
    assert_eq!(result.remaining, 1);
    assert_eq!(inner.peek_all().await.unwrap(), vec![pending]);
}

#[tokio::test]
async fn test_sync_failing_removal_keeps_entries_for_next_sync() {
    let inner = Arc::new(InMemoryOfflineQueue::new());
    let pending = mood("ana", 4.0, 1);
    inner.enqueue(pending.clone()).await.unwrap();
    let repo = Arc::new(InMemoryCheckInRepository::new());

    let stuck = SyncOfflineQueueCommandHandler::new(
        repo.clone(),
        Arc::new(ReadOnlyQueue {
            inner: inner.clone(),
        }),
    );
    let err = stuck.handle(SyncOfflineQueueCommand).await.unwrap_err();
    assert!(matches!(err, DomainError::Infrastructure(_)));
    assert_eq!(inner.len().await.unwrap(), 1);
    assert_eq!(repo.stored_ids().await, vec![pending.id().clone()]);

    // Once the queue is writable again the entry is recognised as stored
    let retry = SyncOfflineQueueCommandHandler::new(repo.clone(), inner.clone());
    let result = retry.handle(SyncOfflineQueueCommand).await.unwrap();

    assert_eq!(result.already_present, 1);
    assert_eq!(result.remaining, 0);
    assert_eq!(repo.stored_ids().await.len(), 1);
}
