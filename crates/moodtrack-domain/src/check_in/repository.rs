use async_trait::async_trait;

use super::entity::CheckIn;
use super::value_objects::CheckInKind;
use crate::shared::{CheckInId, DomainError, SubjectId};

#[async_trait]
pub trait CheckInRepository: Send + Sync {
    /// Append a check-in. Saving an id that already exists is an error:
    /// history is append-only.
    async fn save(&self, check_in: &CheckIn) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &CheckInId) -> Result<Option<CheckIn>, DomainError>;

    /// All check-ins for a subject, newest first, optionally filtered by kind.
    async fn find_by_subject(
        &self,
        subject_id: &SubjectId,
        kind: Option<CheckInKind>,
    ) -> Result<Vec<CheckIn>, DomainError>;

    /// Distinct subject ids that have at least one check-in, sorted.
    async fn list_subject_ids(&self) -> Result<Vec<SubjectId>, DomainError>;

    async fn count_by_subject(&self, subject_id: &SubjectId) -> Result<u64, DomainError>;
}
