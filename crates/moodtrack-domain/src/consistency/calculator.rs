use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::policy::{ConsistencyPolicy, Trend};

/// Anything the calculator can read: an instant and an optional score.
pub trait CheckInLike {
    fn recorded_at(&self) -> DateTime<Utc>;
    fn value(&self) -> Option<f64>;
}

impl<T: CheckInLike + ?Sized> CheckInLike for &T {
    fn recorded_at(&self) -> DateTime<Utc> {
        (**self).recorded_at()
    }

    fn value(&self) -> Option<f64> {
        (**self).value()
    }
}

/// Minimal check-in record, used when callers only have raw timestamps/values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckInSample {
    pub recorded_at: DateTime<Utc>,
    pub value: Option<f64>,
}

impl CheckInSample {
    pub fn new(recorded_at: DateTime<Utc>, value: Option<f64>) -> Self {
        Self { recorded_at, value }
    }

    /// Value as used in averages and trends; missing or non-finite reads as 0.
    pub fn score(&self) -> f64 {
        score_of(self.value)
    }
}

impl CheckInLike for CheckInSample {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    fn value(&self) -> Option<f64> {
        self.value
    }
}

/// Read-only projection over one subject's check-in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyMetrics {
    pub total_entries: u32,
    pub average_score: f64,
    pub latest_value: Option<f64>,
    pub last_entry_timestamp: Option<DateTime<Utc>>,
    pub streak_days: u32,
    pub longest_streak: u32,
    pub consistency_score: u32,
    pub trend: Trend,
}

impl ConsistencyMetrics {
    /// Metrics for a subject with no check-ins.
    pub fn empty() -> Self {
        Self {
            total_entries: 0,
            average_score: 0.0,
            latest_value: None,
            last_entry_timestamp: None,
            streak_days: 0,
            longest_streak: 0,
            consistency_score: 0,
            trend: Trend::Stable,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_entries == 0
    }
}

impl Default for ConsistencyMetrics {
    fn default() -> Self {
        Self::empty()
    }
}

/// Pure streak / consistency computation. Holds only its policy; every call
/// is independent and leaves the input untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsistencyCalculator {
    policy: ConsistencyPolicy,
}

impl ConsistencyCalculator {
    pub fn new(policy: ConsistencyPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ConsistencyPolicy {
        &self.policy
    }

    /// Metrics with "today" taken from the wall clock in the policy's offset.
    pub fn calculate<T: CheckInLike>(&self, check_ins: &[T]) -> ConsistencyMetrics {
        self.calculate_at(check_ins, self.policy.today())
    }

    pub fn calculate_at<T: CheckInLike>(&self, check_ins: &[T], today: NaiveDate) -> ConsistencyMetrics {
        let ordered = sorted_by_recency(check_ins);
        let Some(latest) = ordered.first() else {
            return ConsistencyMetrics::empty();
        };

        let total = ordered.len();
        let sum: f64 = ordered.iter().map(CheckInSample::score).sum();

        let trend = match ordered.get(1) {
            Some(previous) => self.policy.tie_break().compare(latest.score(), previous.score()),
            None => Trend::Stable,
        };

        let days = self.distinct_days_desc(&ordered);

        ConsistencyMetrics {
            total_entries: u32::try_from(total).unwrap_or(u32::MAX),
            average_score: sum / total as f64,
            latest_value: Some(latest.score()),
            last_entry_timestamp: Some(latest.recorded_at),
            streak_days: current_streak(&days, today),
            longest_streak: longest_streak(&days),
            consistency_score: consistency_score(total, self.policy.target_entries()),
            trend,
        }
    }

    /// Distinct calendar days, most recent first.
    pub fn distinct_days_desc(&self, ordered: &[CheckInSample]) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> = ordered
            .iter()
            .map(|s| self.policy.day_of(s.recorded_at))
            .collect();
        days.sort_unstable_by(|a, b| b.cmp(a));
        days.dedup();
        days
    }
}

pub(crate) fn score_of(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Newest first; equal instants are ordered by score so the result does not
/// depend on the caller's ordering.
pub(crate) fn sorted_by_recency<T: CheckInLike>(check_ins: &[T]) -> Vec<CheckInSample> {
    let mut samples: Vec<CheckInSample> = check_ins
        .iter()
        .map(|c| CheckInSample::new(c.recorded_at(), c.value()))
        .collect();

    samples.sort_by(|a, b| {
        b.recorded_at
            .cmp(&a.recorded_at)
            .then_with(|| b.score().total_cmp(&a.score()))
    });
    samples
}

/// Consecutive days ending today or yesterday. Days after `today` are ignored.
fn current_streak(days_desc: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut past = days_desc.iter().copied().skip_while(|day| *day > today);

    let Some(anchor) = past.next() else {
        return 0;
    };

    if (today - anchor).num_days() > 1 {
        return 0;
    }

    let mut streak = 1u32;
    let mut previous = anchor;
    for day in past {
        if (previous - day).num_days() != 1 {
            break;
        }
        streak += 1;
        previous = day;
    }

    streak
}

fn longest_streak(days_desc: &[NaiveDate]) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for &day in days_desc {
        run = match previous {
            Some(prev) if (prev - day).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }

    longest
}

fn consistency_score(total_entries: usize, target_entries: u32) -> u32 {
    let target = u64::from(target_entries.max(1));
    let scaled = (total_entries as u64).saturating_mul(100) / target;
    scaled.min(100) as u32
}
