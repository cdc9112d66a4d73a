use async_trait::async_trait;

use moodtrack_domain::check_in::{CheckIn, CheckInKind, CheckInRepository};
use moodtrack_domain::shared::{CheckInId, DomainError, SubjectId};

/// Stands in when the database could not be opened. Every call fails with a
/// recoverable error, so writers fall back to the offline queue.
pub struct UnavailableCheckInRepository {
    reason: String,
}

impl UnavailableCheckInRepository {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> DomainError {
        DomainError::Infrastructure(format!("Check-in store unavailable: {}", self.reason))
    }
}

#[async_trait]
impl CheckInRepository for UnavailableCheckInRepository {
    async fn save(&self, _check_in: &CheckIn) -> Result<(), DomainError> {
        Err(self.error())
    }

    async fn find_by_id(&self, _id: &CheckInId) -> Result<Option<CheckIn>, DomainError> {
        Err(self.error())
    }

    async fn find_by_subject(
        &self,
        _subject_id: &SubjectId,
        _kind: Option<CheckInKind>,
    ) -> Result<Vec<CheckIn>, DomainError> {
        Err(self.error())
    }

    async fn list_subject_ids(&self) -> Result<Vec<SubjectId>, DomainError> {
        Err(self.error())
    }

    async fn count_by_subject(&self, _subject_id: &SubjectId) -> Result<u64, DomainError> {
        Err(self.error())
    }
}
