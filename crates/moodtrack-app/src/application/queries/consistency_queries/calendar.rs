use chrono::{Datelike, NaiveDate};
use log::{info, warn};

use crate::application::dtos::{CalendarDayDto, CheckInCalendarDto, MonthStatsDto};
use moodtrack_domain::check_in::{CheckInKind, CheckInRepository};
use moodtrack_domain::consistency::ConsistencyPolicy;
use moodtrack_domain::shared::DomainError;

use super::helpers;

pub async fn get_calendar(
    check_in_repo: &dyn CheckInRepository,
    policy: &ConsistencyPolicy,
    subject_id: &str,
    year: i32,
    month: u32,
    kind: Option<CheckInKind>,
) -> Result<CheckInCalendarDto, DomainError> {
    if !(1..=12).contains(&month) {
        return Err(DomainError::Validation(format!(
            "Invalid month {}, expected 1-12",
            month
        )));
    }

    let first_day = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| DomainError::Validation(format!("Invalid year {}", year)))?;
    let first_day_next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last_day = first_day_next_month
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| DomainError::Validation(format!("Invalid year {}", year)))?;

    let subject_id = helpers::parse_subject_id(subject_id)?;
    let history = helpers::load_history(check_in_repo, &subject_id, kind).await?;
    let daily = helpers::daily_index(&history, policy);

    let mut days = Vec::with_capacity(last_day.day() as usize);
    let mut checked_in_days = 0u32;
    let mut total_entries = 0u32;

    for date in first_day.iter_days().take_while(|d| *d <= last_day) {
        let day = daily.get(&date);
        if let Some(day) = day {
            checked_in_days += 1;
            total_entries += day.entry_count();
        }
        days.push(CalendarDayDto {
            date: helpers::format_date(date),
            checked_in: day.is_some(),
            entry_count: day.map_or(0, |d| d.entry_count()),
            average_value: day.map(|d| d.average_value()),
        });
    }

    let total_days = last_day.day();
    let month_label = format!("{:04}-{:02}", year, month);
    if checked_in_days == 0 {
        warn!(
            "[streak] calendar empty subject_id={} month={}",
            subject_id, month_label
        );
    } else {
        info!(
            "[streak] calendar subject_id={} month={} checked_in_days={}",
            subject_id, month_label, checked_in_days
        );
    }

    Ok(CheckInCalendarDto {
        subject_id: subject_id.to_string(),
        year,
        month,
        days,
        month_stats: MonthStatsDto {
            total_days,
            checked_in_days,
            check_in_rate: f64::from(checked_in_days) / f64::from(total_days) * 100.0,
            total_entries,
        },
    })
}
