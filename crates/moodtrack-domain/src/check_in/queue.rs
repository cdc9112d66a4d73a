use async_trait::async_trait;

use super::entity::CheckIn;
use crate::shared::{CheckInId, DomainError};

/// Holding area for check-ins recorded while the store is unreachable.
///
/// Implementations are injected into the application context; nothing in the
/// domain assumes a process-wide instance. Reading never removes anything:
/// an entry leaves the queue only through `remove`, once it is stored.
#[async_trait]
pub trait OfflineQueue: Send + Sync {
    /// Append to the back of the queue.
    async fn enqueue(&self, check_in: CheckIn) -> Result<(), DomainError>;

    /// Every queued check-in in FIFO order. The queue is left as is.
    async fn peek_all(&self) -> Result<Vec<CheckIn>, DomainError>;

    /// Drop the entries with these ids and return how many were dropped.
    /// Unknown ids are ignored; everything else keeps its position.
    async fn remove(&self, ids: &[CheckInId]) -> Result<usize, DomainError>;

    async fn len(&self) -> Result<usize, DomainError>;

    async fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len().await? == 0)
    }
}
