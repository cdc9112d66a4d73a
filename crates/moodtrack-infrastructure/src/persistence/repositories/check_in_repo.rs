use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

use crate::persistence::SqliteRepositoryBase;
use moodtrack_domain::check_in::{CheckIn, CheckInKind, CheckInRepository};
use moodtrack_domain::shared::{CheckInId, DomainError, SubjectId};

#[derive(FromRow)]
struct CheckInRow {
    id: String,
    subject_id: String,
    kind: String,
    value: Option<f64>,
    note: Option<String>,
    recorded_at: DateTime<Utc>,
}

impl CheckInRow {
    fn try_into_check_in(self) -> Result<CheckIn, DomainError> {
        let kind: CheckInKind = self.kind.parse().map_err(|_| {
            DomainError::DataIntegrity(format!(
                "Unknown kind '{}' stored for check-in {}",
                self.kind, self.id
            ))
        })?;

        Ok(CheckIn::restore(
            CheckInId::from_string(&self.id),
            SubjectId::from_string(&self.subject_id),
            kind,
            self.value,
            self.note,
            self.recorded_at,
        ))
    }
}

pub struct SqliteCheckInRepository {
    base: SqliteRepositoryBase,
}

impl SqliteCheckInRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl CheckInRepository for SqliteCheckInRepository {
    async fn save(&self, check_in: &CheckIn) -> Result<(), DomainError> {
        // Plain INSERT: history is append-only, a reused id must fail
        let query = r#"
            INSERT INTO check_ins (
                id,
                subject_id,
                kind,
                value,
                note,
                recorded_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#;

        self.base
            .execute(
                sqlx::query(query)
                    .bind(check_in.id().as_str())
                    .bind(check_in.subject_id().as_str())
                    .bind(check_in.kind().as_str())
                    .bind(check_in.value())
                    .bind(check_in.note())
                    .bind(check_in.recorded_at()),
                "Save check-in",
            )
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &CheckInId) -> Result<Option<CheckIn>, DomainError> {
        let query = r#"
            SELECT id, subject_id, kind, value, note, recorded_at
            FROM check_ins
            WHERE id = ?1
        "#;

        let row: Option<CheckInRow> = self
            .base
            .fetch_optional(sqlx::query_as(query).bind(id.as_str()), "Find check-in by ID")
            .await?;

        row.map(|r| r.try_into_check_in()).transpose()
    }

    async fn find_by_subject(
        &self,
        subject_id: &SubjectId,
        kind: Option<CheckInKind>,
    ) -> Result<Vec<CheckIn>, DomainError> {
        let query = r#"
            SELECT id, subject_id, kind, value, note, recorded_at
            FROM check_ins
            WHERE subject_id = ?1 AND (?2 IS NULL OR kind = ?2)
            ORDER BY recorded_at DESC, id DESC
        "#;

        let rows: Vec<CheckInRow> = self
            .base
            .fetch_all(
                sqlx::query_as(query)
                    .bind(subject_id.as_str())
                    .bind(kind.map(|k| k.as_str())),
                "Find check-ins by subject",
            )
            .await?;

        rows.into_iter().map(|r| r.try_into_check_in()).collect()
    }

    async fn list_subject_ids(&self) -> Result<Vec<SubjectId>, DomainError> {
        let query = "SELECT DISTINCT subject_id FROM check_ins ORDER BY subject_id ASC";

        let ids: Vec<String> = self
            .base
            .fetch_scalars(sqlx::query_scalar(query), "List subject IDs")
            .await?;

        Ok(ids.iter().map(|id| SubjectId::from_string(id)).collect())
    }

    async fn count_by_subject(&self, subject_id: &SubjectId) -> Result<u64, DomainError> {
        let query = "SELECT COUNT(*) FROM check_ins WHERE subject_id = ?1";

        let count: i64 = self
            .base
            .fetch_scalar(
                sqlx::query_scalar(query).bind(subject_id.as_str()),
                "Count check-ins by subject",
            )
            .await?;

        u64::try_from(count)
            .map_err(|_| DomainError::DataIntegrity(format!("Negative check-in count: {}", count)))
    }
}
