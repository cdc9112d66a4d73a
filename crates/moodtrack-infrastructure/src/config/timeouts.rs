use std::time::Duration;

/// Timeouts applied around database access
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Waiting for a pooled connection
    pub db_acquire: Duration,

    /// A single query, including row decoding
    pub db_query: Duration,

    /// Reading / writing the offline queue file
    pub queue_io: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        GLOBAL_TIMEOUT_CONFIG.clone()
    }
}

impl TimeoutConfig {
    /// Get the global timeout configuration
    pub fn global() -> &'static Self {
        &GLOBAL_TIMEOUT_CONFIG
    }
}

static GLOBAL_TIMEOUT_CONFIG: TimeoutConfig = TimeoutConfig {
    db_acquire: Duration::from_secs(5),
    db_query: Duration::from_secs(10),
    queue_io: Duration::from_secs(5),
};
