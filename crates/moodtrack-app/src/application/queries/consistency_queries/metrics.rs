use chrono::NaiveDate;
use log::info;
use std::cmp::Ordering;

use crate::application::dtos::ConsistencyMetricsDto;
use moodtrack_domain::check_in::{CheckInKind, CheckInRepository};
use moodtrack_domain::consistency::ConsistencyCalculator;
use moodtrack_domain::shared::{DomainError, SubjectId};

use super::helpers;

pub async fn get_metrics(
    check_in_repo: &dyn CheckInRepository,
    calculator: &ConsistencyCalculator,
    today: NaiveDate,
    subject_id: &str,
    kind: Option<CheckInKind>,
) -> Result<ConsistencyMetricsDto, DomainError> {
    let subject_id = helpers::parse_subject_id(subject_id)?;
    let dto = metrics_for(check_in_repo, calculator, today, &subject_id, kind).await?;

    info!(
        "[streak] get_metrics subject_id={} kind={:?} entries={} streak={} longest={}",
        dto.subject_id,
        dto.kind,
        dto.metrics.total_entries,
        dto.metrics.streak_days,
        dto.metrics.longest_streak
    );

    Ok(dto)
}

/// Subjects without any matching check-in are left out
pub async fn get_all_metrics(
    check_in_repo: &dyn CheckInRepository,
    calculator: &ConsistencyCalculator,
    today: NaiveDate,
    kind: Option<CheckInKind>,
) -> Result<Vec<ConsistencyMetricsDto>, DomainError> {
    let subject_ids = check_in_repo.list_subject_ids().await?;
    let mut results = Vec::with_capacity(subject_ids.len());

    for subject_id in &subject_ids {
        let dto = metrics_for(check_in_repo, calculator, today, subject_id, kind).await?;
        if !dto.metrics.is_empty() {
            results.push(dto);
        }
    }

    results.sort_by(leaderboard_order);

    info!(
        "[streak] get_all_metrics subjects={} ranked={} kind={:?}",
        subject_ids.len(),
        results.len(),
        kind
    );
    Ok(results)
}

async fn metrics_for(
    check_in_repo: &dyn CheckInRepository,
    calculator: &ConsistencyCalculator,
    today: NaiveDate,
    subject_id: &SubjectId,
    kind: Option<CheckInKind>,
) -> Result<ConsistencyMetricsDto, DomainError> {
    let history = helpers::load_history(check_in_repo, subject_id, kind).await?;
    let metrics = calculator.calculate_at(&history, today);

    Ok(ConsistencyMetricsDto {
        subject_id: subject_id.to_string(),
        kind: helpers::kind_label(kind),
        as_of: helpers::format_date(today),
        metrics,
    })
}

fn leaderboard_order(a: &ConsistencyMetricsDto, b: &ConsistencyMetricsDto) -> Ordering {
    b.metrics
        .streak_days
        .cmp(&a.metrics.streak_days)
        .then_with(|| a.subject_id.cmp(&b.subject_id))
}
