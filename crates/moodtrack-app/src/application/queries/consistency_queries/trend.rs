use chrono::{Duration, NaiveDate};
use log::{info, warn};

use crate::application::dtos::{CheckInDayDto, CheckInDto, CheckInTrendDto, TrendDataPoint};
use moodtrack_domain::check_in::{CheckInKind, CheckInRepository};
use moodtrack_domain::consistency::{group_by_day, ConsistencyPolicy};
use moodtrack_domain::shared::DomainError;

use super::helpers;

pub const MAX_TREND_DAYS: u32 = 365;

pub async fn get_trend(
    check_in_repo: &dyn CheckInRepository,
    policy: &ConsistencyPolicy,
    today: NaiveDate,
    subject_id: &str,
    days: u32,
    kind: Option<CheckInKind>,
) -> Result<CheckInTrendDto, DomainError> {
    if days == 0 || days > MAX_TREND_DAYS {
        return Err(DomainError::Validation(format!(
            "Days must be between 1 and {}",
            MAX_TREND_DAYS
        )));
    }

    let end_date = today;
    let start_date = end_date - Duration::days(i64::from(days) - 1);

    let subject_id = helpers::parse_subject_id(subject_id)?;
    let history = helpers::load_history(check_in_repo, &subject_id, kind).await?;
    let daily = helpers::daily_index(&history, policy);

    let data_points: Vec<TrendDataPoint> = start_date
        .iter_days()
        .take(days as usize)
        .map(|date| {
            let day = daily.get(&date);
            TrendDataPoint {
                date: helpers::format_date(date),
                checked_in: day.is_some(),
                entry_count: day.map_or(0, |d| d.entry_count()),
                average_value: day.map(|d| d.average_value()),
            }
        })
        .collect();

    let checked_in = data_points.iter().filter(|p| p.checked_in).count();
    if checked_in == 0 {
        warn!(
            "[streak] trend empty subject_id={} range={}~{}",
            subject_id, start_date, end_date
        );
    } else {
        info!(
            "[streak] trend subject_id={} range={}~{} checked_in_days={}",
            subject_id, start_date, end_date, checked_in
        );
    }

    Ok(CheckInTrendDto {
        subject_id: subject_id.to_string(),
        start_date: helpers::format_date(start_date),
        end_date: helpers::format_date(end_date),
        data_points,
    })
}

pub async fn get_day_detail(
    check_in_repo: &dyn CheckInRepository,
    policy: &ConsistencyPolicy,
    subject_id: &str,
    date: &str,
    kind: Option<CheckInKind>,
) -> Result<CheckInDayDto, DomainError> {
    let parsed_date = NaiveDate::parse_from_str(date.trim(), helpers::DATE_FORMAT).map_err(|_| {
        DomainError::Validation(format!(
            "Invalid date format '{}', expected YYYY-MM-DD",
            date
        ))
    })?;

    let subject_id = helpers::parse_subject_id(subject_id)?;
    let history = helpers::load_history(check_in_repo, &subject_id, kind).await?;

    let entries: Vec<_> = history
        .into_iter()
        .filter(|c| policy.day_of(c.recorded_at()) == parsed_date)
        .collect();
    let summary = group_by_day(&entries, policy).into_iter().next();

    info!(
        "[streak] day detail subject_id={} date={} entries={}",
        subject_id,
        parsed_date,
        entries.len()
    );

    Ok(CheckInDayDto {
        subject_id: subject_id.to_string(),
        date: helpers::format_date(parsed_date),
        checked_in: summary.is_some(),
        entry_count: summary.as_ref().map_or(0, |d| d.entry_count()),
        average_value: summary.as_ref().map(|d| d.average_value()),
        entries: entries.iter().map(CheckInDto::from).collect(),
    })
}
