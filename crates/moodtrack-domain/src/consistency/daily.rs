use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::calculator::{score_of, CheckInLike};
use super::policy::ConsistencyPolicy;

/// Check-ins collapsed onto one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCheckIns {
    date: NaiveDate,
    entry_count: u32,
    average_value: f64,
}

impl DailyCheckIns {
    pub fn restore(date: NaiveDate, entry_count: u32, average_value: f64) -> Self {
        Self {
            date,
            entry_count,
            average_value,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn entry_count(&self) -> u32 {
        self.entry_count
    }

    pub fn average_value(&self) -> f64 {
        self.average_value
    }
}

/// Group check-ins by calendar day (in the policy's offset), oldest day first.
pub fn group_by_day<T: CheckInLike>(check_ins: &[T], policy: &ConsistencyPolicy) -> Vec<DailyCheckIns> {
    let mut buckets: BTreeMap<NaiveDate, (u32, f64)> = BTreeMap::new();

    for check_in in check_ins {
        let entry = buckets
            .entry(policy.day_of(check_in.recorded_at()))
            .or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += score_of(check_in.value());
    }

    buckets
        .into_iter()
        .map(|(date, (count, sum))| DailyCheckIns::restore(date, count, sum / f64::from(count)))
        .collect()
}
