use chrono::NaiveDate;
use std::collections::HashMap;

use moodtrack_domain::check_in::{CheckIn, CheckInKind, CheckInRepository};
use moodtrack_domain::consistency::{group_by_day, ConsistencyPolicy, DailyCheckIns};
use moodtrack_domain::shared::{DomainError, SubjectId};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_subject_id(raw: &str) -> Result<SubjectId, DomainError> {
    let subject_id = SubjectId::from_string(raw.trim());
    if subject_id.is_blank() {
        return Err(DomainError::Validation("Subject id cannot be empty".to_string()));
    }
    Ok(subject_id)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Full history for a subject, newest first
pub async fn load_history(
    check_in_repo: &dyn CheckInRepository,
    subject_id: &SubjectId,
    kind: Option<CheckInKind>,
) -> Result<Vec<CheckIn>, DomainError> {
    check_in_repo.find_by_subject(subject_id, kind).await
}

pub fn daily_index(
    history: &[CheckIn],
    policy: &ConsistencyPolicy,
) -> HashMap<NaiveDate, DailyCheckIns> {
    group_by_day(history, policy)
        .into_iter()
        .map(|day| (day.date(), day))
        .collect()
}

pub fn kind_label(kind: Option<CheckInKind>) -> Option<String> {
    kind.map(|k| k.as_str().to_string())
}
