use async_trait::async_trait;
use moodtrack_domain::shared::DomainError;

/// Marker trait for all commands
pub trait Command: Send + Sync {}

#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    type Result;

    async fn handle(&self, command: C) -> Result<Self::Result, DomainError>;
}
