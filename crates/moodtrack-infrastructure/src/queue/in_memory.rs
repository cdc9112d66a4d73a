use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::Mutex;

use moodtrack_domain::check_in::{CheckIn, OfflineQueue};
use moodtrack_domain::shared::{CheckInId, DomainError};

pub const DEFAULT_QUEUE_CAPACITY: usize = 1_000;

/// Process-local offline queue. Contents are lost when the process exits.
pub struct InMemoryOfflineQueue {
    items: Mutex<VecDeque<CheckIn>>,
    capacity: usize,
}

impl InMemoryOfflineQueue {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            capacity,
        }
    }
}

impl Default for InMemoryOfflineQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OfflineQueue for InMemoryOfflineQueue {
    async fn enqueue(&self, check_in: CheckIn) -> Result<(), DomainError> {
        let mut items = self.items.lock().await;
        if items.len() >= self.capacity {
            return Err(DomainError::Infrastructure(format!(
                "Offline queue is full ({} check-ins)",
                self.capacity
            )));
        }
        items.push_back(check_in);
        Ok(())
    }

    async fn peek_all(&self) -> Result<Vec<CheckIn>, DomainError> {
        Ok(self.items.lock().await.iter().cloned().collect())
    }

    async fn remove(&self, ids: &[CheckInId]) -> Result<usize, DomainError> {
        let mut items = self.items.lock().await;
        let before = items.len();
        items.retain(|c| !ids.contains(c.id()));
        Ok(before - items.len())
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.items.lock().await.len())
    }
}
