use serde::{Deserialize, Serialize};

use super::CheckInDto;
use moodtrack_domain::consistency::ConsistencyMetrics;

/// Metrics for one subject, optionally restricted to one kind of check-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyMetricsDto {
    pub subject_id: String,
    pub kind: Option<String>,
    pub as_of: String, // YYYY-MM-DD the streak was evaluated against
    #[serde(flatten)]
    pub metrics: ConsistencyMetrics,
}

// ============================================================
// Calendar
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDayDto {
    pub date: String, // YYYY-MM-DD
    pub checked_in: bool,
    pub entry_count: u32,
    pub average_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthStatsDto {
    pub total_days: u32,
    pub checked_in_days: u32,
    pub check_in_rate: f64, // 0.0 - 100.0
    pub total_entries: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInCalendarDto {
    pub subject_id: String,
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDayDto>,
    pub month_stats: MonthStatsDto,
}

// ============================================================
// Trend
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendDataPoint {
    pub date: String,
    pub checked_in: bool,
    pub entry_count: u32,
    pub average_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInTrendDto {
    pub subject_id: String,
    pub start_date: String,
    pub end_date: String,
    pub data_points: Vec<TrendDataPoint>,
}

// ============================================================
// Day detail
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInDayDto {
    pub subject_id: String,
    pub date: String,
    pub checked_in: bool,
    pub entry_count: u32,
    pub average_value: Option<f64>,
    pub entries: Vec<CheckInDto>,
}
