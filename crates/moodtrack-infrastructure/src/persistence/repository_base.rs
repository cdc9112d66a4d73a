use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moodtrack_domain::shared::DomainError;
use sqlx::query::{Query, QueryAs, QueryScalar};
use sqlx::sqlite::{SqliteArguments, SqliteQueryResult, SqliteRow};
use sqlx::{FromRow, Sqlite, SqlitePool};

use super::RepositoryErrorMapper;
use crate::config::TimeoutConfig;

/// Common plumbing for SQLite repositories: pool access, per-query timeout
/// and error mapping.
pub struct SqliteRepositoryBase {
    pool: Arc<SqlitePool>,
    query_timeout: Duration,
}

impl SqliteRepositoryBase {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self::with_timeouts(pool, TimeoutConfig::global())
    }

    pub fn with_timeouts(pool: Arc<SqlitePool>, timeouts: &TimeoutConfig) -> Self {
        Self {
            pool,
            query_timeout: timeouts.db_query,
        }
    }

    pub async fn execute<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
        context: &str,
    ) -> Result<SqliteQueryResult, DomainError> {
        self.run(query.execute(self.pool.as_ref()), context).await
    }

    pub async fn fetch_optional<'q, T>(
        &self,
        query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
        context: &str,
    ) -> Result<Option<T>, DomainError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        self.run(query.fetch_optional(self.pool.as_ref()), context)
            .await
    }

    pub async fn fetch_all<'q, T>(
        &self,
        query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
        context: &str,
    ) -> Result<Vec<T>, DomainError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        self.run(query.fetch_all(self.pool.as_ref()), context).await
    }

    pub async fn fetch_scalar<'q, T>(
        &self,
        query: QueryScalar<'q, Sqlite, T, SqliteArguments<'q>>,
        context: &str,
    ) -> Result<T, DomainError>
    where
        (T,): for<'r> FromRow<'r, SqliteRow>,
        T: Send + Unpin,
    {
        self.run(query.fetch_one(self.pool.as_ref()), context).await
    }

    pub async fn fetch_scalars<'q, T>(
        &self,
        query: QueryScalar<'q, Sqlite, T, SqliteArguments<'q>>,
        context: &str,
    ) -> Result<Vec<T>, DomainError>
    where
        (T,): for<'r> FromRow<'r, SqliteRow>,
        T: Send + Unpin,
    {
        self.run(query.fetch_all(self.pool.as_ref()), context).await
    }

    async fn run<F, T>(&self, fut: F, context: &str) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, context)),
            Err(_) => Err(DomainError::Timeout(format!(
                "{} exceeded {}ms",
                context,
                self.query_timeout.as_millis()
            ))),
        }
    }
}
