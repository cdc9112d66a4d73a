use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::config::TimeoutConfig;
use moodtrack_domain::check_in::{CheckIn, OfflineQueue};
use moodtrack_domain::shared::{CheckInId, DomainError};

/// Offline queue persisted as a JSON array so it survives between CLI runs.
///
/// Every operation reads the whole file; changes rewrite it through a
/// sibling temporary file followed by a rename. A missing file is an empty
/// queue.
pub struct JsonFileOfflineQueue {
    path: PathBuf,
    lock: Mutex<()>,
    io_timeout: Duration,
}

impl JsonFileOfflineQueue {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            io_timeout: TimeoutConfig::global().queue_io,
        }
    }

    async fn load(&self) -> Result<VecDeque<CheckIn>, DomainError> {
        let read = tokio::time::timeout(self.io_timeout, tokio::fs::read(&self.path)).await;
        let bytes = match read {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => return Ok(VecDeque::new()),
            Ok(Err(e)) => {
                return Err(DomainError::Infrastructure(format!(
                    "Failed to read offline queue {}: {}",
                    self.path.display(),
                    e
                )))
            }
            Err(_) => return Err(self.timed_out("read")),
        };

        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(VecDeque::new());
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            DomainError::Deserialization(format!(
                "Offline queue {} is corrupt: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn store(&self, items: &VecDeque<CheckIn>) -> Result<(), DomainError> {
        let json = serde_json::to_vec_pretty(items)
            .map_err(|e| DomainError::Serialization(e.to_string()))?;

        let write = async {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            let tmp = self.path.with_extension("json.tmp");
            tokio::fs::write(&tmp, &json).await?;
            tokio::fs::rename(&tmp, &self.path).await
        };

        match tokio::time::timeout(self.io_timeout, write).await {
            Ok(result) => result.map_err(|e| {
                DomainError::Infrastructure(format!(
                    "Failed to write offline queue {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(_) => Err(self.timed_out("write")),
        }
    }

    fn timed_out(&self, op: &str) -> DomainError {
        DomainError::Timeout(format!(
            "Offline queue {} of {} exceeded {}ms",
            op,
            self.path.display(),
            self.io_timeout.as_millis()
        ))
    }
}

#[async_trait]
impl OfflineQueue for JsonFileOfflineQueue {
    async fn enqueue(&self, check_in: CheckIn) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        let mut items = self.load().await?;
        items.push_back(check_in);
        self.store(&items).await
    }

    async fn peek_all(&self) -> Result<Vec<CheckIn>, DomainError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.into())
    }

    async fn remove(&self, ids: &[CheckInId]) -> Result<usize, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let _guard = self.lock.lock().await;
        let mut items = self.load().await?;
        let before = items.len();
        items.retain(|c| !ids.contains(c.id()));
        let removed = before - items.len();
        if removed > 0 {
            self.store(&items).await?;
        }
        Ok(removed)
    }

    async fn len(&self) -> Result<usize, DomainError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.len())
    }
}
