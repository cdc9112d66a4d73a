//! In-memory doubles shared by application tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use tokio::sync::RwLock;

use moodtrack_domain::check_in::{CheckIn, CheckInKind, CheckInRepository};
use moodtrack_domain::shared::{CheckInId, DomainError, SubjectId};

pub struct InMemoryCheckInRepository {
    check_ins: RwLock<Vec<CheckIn>>,
}

impl InMemoryCheckInRepository {
    pub fn new() -> Self {
        Self {
            check_ins: RwLock::new(Vec::new()),
        }
    }

    pub async fn with(check_ins: Vec<CheckIn>) -> Self {
        let repo = Self::new();
        for check_in in &check_ins {
            repo.save(check_in).await.expect("seed check-in");
        }
        repo
    }

    pub async fn stored_ids(&self) -> Vec<CheckInId> {
        self.check_ins
            .read()
            .await
            .iter()
            .map(|c| c.id().clone())
            .collect()
    }
}

#[async_trait]
impl CheckInRepository for InMemoryCheckInRepository {
    async fn save(&self, check_in: &CheckIn) -> Result<(), DomainError> {
        let mut check_ins = self.check_ins.write().await;
        if check_ins.iter().any(|c| c.id() == check_in.id()) {
            return Err(DomainError::ConstraintViolation(format!(
                "check_ins.id {} already exists",
                check_in.id()
            )));
        }
        check_ins.push(check_in.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &CheckInId) -> Result<Option<CheckIn>, DomainError> {
        let check_ins = self.check_ins.read().await;
        Ok(check_ins.iter().find(|c| c.id() == id).cloned())
    }

    async fn find_by_subject(
        &self,
        subject_id: &SubjectId,
        kind: Option<CheckInKind>,
    ) -> Result<Vec<CheckIn>, DomainError> {
        let check_ins = self.check_ins.read().await;
        let mut found: Vec<CheckIn> = check_ins
            .iter()
            .filter(|c| c.subject_id() == subject_id)
            .filter(|c| kind.map_or(true, |k| c.kind() == k))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.recorded_at().cmp(&a.recorded_at()));
        Ok(found)
    }

    async fn list_subject_ids(&self) -> Result<Vec<SubjectId>, DomainError> {
        let check_ins = self.check_ins.read().await;
        let mut ids: Vec<SubjectId> = check_ins.iter().map(|c| c.subject_id().clone()).collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn count_by_subject(&self, subject_id: &SubjectId) -> Result<u64, DomainError> {
        let check_ins = self.check_ins.read().await;
        Ok(check_ins.iter().filter(|c| c.subject_id() == subject_id).count() as u64)
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

/// Noon UTC, `days_ago` days before [`today`]
pub fn at(days_ago: i64) -> DateTime<Utc> {
    let date = today() - Duration::days(days_ago);
    Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
}

pub fn check_in(subject: &str, kind: CheckInKind, value: f64, recorded_at: DateTime<Utc>) -> CheckIn {
    let note = kind.requires_note().then(|| "entry".to_string());
    CheckIn::new(
        SubjectId::from_string(subject),
        kind,
        Some(value),
        note,
        recorded_at,
    )
    .unwrap()
}

pub fn mood(subject: &str, value: f64, days_ago: i64) -> CheckIn {
    check_in(subject, CheckInKind::Mood, value, at(days_ago))
}
