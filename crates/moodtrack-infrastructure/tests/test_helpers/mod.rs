#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use sqlx::SqlitePool;

use moodtrack_domain::check_in::{CheckIn, CheckInKind};
use moodtrack_domain::shared::SubjectId;
use moodtrack_infrastructure::persistence::Database;

/// Fresh in-memory database with migrations applied
pub async fn setup_in_memory_db() -> SqlitePool {
    let db = Database::in_memory().await.expect("open in-memory db");
    db.run_migrations().await.expect("run migrations");
    db.pool().clone()
}

/// Noon UTC `days_ago` days before `today`
pub fn noon_days_ago(today: NaiveDate, days_ago: i64) -> DateTime<Utc> {
    let date = today - Duration::days(days_ago);
    Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).expect("valid time"))
}

pub fn mood(subject: &SubjectId, value: f64, at: DateTime<Utc>) -> CheckIn {
    CheckIn::new(subject.clone(), CheckInKind::Mood, Some(value), None, at)
        .expect("valid check-in")
}
