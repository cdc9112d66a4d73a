use chrono::NaiveDate;
use std::sync::Arc;

use crate::application::dtos::{
    CheckInCalendarDto, CheckInDayDto, CheckInTrendDto, ConsistencyMetricsDto,
};
use moodtrack_domain::check_in::{CheckInKind, CheckInRepository};
use moodtrack_domain::consistency::ConsistencyCalculator;
use moodtrack_domain::shared::DomainError;

mod calendar;
mod helpers;
mod metrics;
mod trend;


/// Read side: everything derived from a subject's stored history.
///
/// Day boundaries, trend tie-break and consistency target all come from the
/// calculator's policy.
pub struct ConsistencyQueries {
    check_in_repo: Arc<dyn CheckInRepository>,
    calculator: ConsistencyCalculator,
    fixed_today: Option<NaiveDate>,
}

impl ConsistencyQueries {
    pub fn new(check_in_repo: Arc<dyn CheckInRepository>, calculator: ConsistencyCalculator) -> Self {
        Self {
            check_in_repo,
            calculator,
            fixed_today: None,
        }
    }

    /// Evaluate streaks against `today` instead of the wall clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.fixed_today
            .unwrap_or_else(|| self.calculator.policy().today())
    }

    /// Metrics for a single subject
    pub async fn get_metrics(
        &self,
        subject_id: &str,
        kind: Option<CheckInKind>,
    ) -> Result<ConsistencyMetricsDto, DomainError> {
        metrics::get_metrics(
            self.check_in_repo.as_ref(),
            &self.calculator,
            self.today(),
            subject_id,
            kind,
        )
        .await
    }

    /// Metrics for every subject, longest current streak first
    pub async fn get_all_metrics(
        &self,
        kind: Option<CheckInKind>,
    ) -> Result<Vec<ConsistencyMetricsDto>, DomainError> {
        metrics::get_all_metrics(
            self.check_in_repo.as_ref(),
            &self.calculator,
            self.today(),
            kind,
        )
        .await
    }

    /// Check-in calendar for a specific month
    pub async fn get_calendar(
        &self,
        subject_id: &str,
        year: i32,
        month: u32,
        kind: Option<CheckInKind>,
    ) -> Result<CheckInCalendarDto, DomainError> {
        calendar::get_calendar(
            self.check_in_repo.as_ref(),
            self.calculator.policy(),
            subject_id,
            year,
            month,
            kind,
        )
        .await
    }

    /// Daily series for the last `days` days, ending today
    pub async fn get_trend(
        &self,
        subject_id: &str,
        days: u32,
        kind: Option<CheckInKind>,
    ) -> Result<CheckInTrendDto, DomainError> {
        trend::get_trend(
            self.check_in_repo.as_ref(),
            self.calculator.policy(),
            self.today(),
            subject_id,
            days,
            kind,
        )
        .await
    }

    /// Entries recorded on one day (`YYYY-MM-DD`)
    pub async fn get_day_detail(
        &self,
        subject_id: &str,
        date: &str,
        kind: Option<CheckInKind>,
    ) -> Result<CheckInDayDto, DomainError> {
        trend::get_day_detail(
            self.check_in_repo.as_ref(),
            self.calculator.policy(),
            subject_id,
            date,
            kind,
        )
        .await
    }
}
