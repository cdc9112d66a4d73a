use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::DomainError;

/// Denominator of the consistency score: this many entries reads as 100.
pub const DEFAULT_TARGET_ENTRIES: u32 = 30;

/// Direction of the two most recent check-in values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How equal consecutive values are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendTieBreak {
    /// newer >= older is improving; equal values never read as stable.
    #[default]
    NonDecreasingImproves,
    /// newer > older is improving, equal is stable.
    StrictIncreaseOnly,
}

impl TrendTieBreak {
    pub fn compare(&self, newer: f64, older: f64) -> Trend {
        match self {
            TrendTieBreak::NonDecreasingImproves => {
                if newer >= older {
                    Trend::Improving
                } else {
                    Trend::Declining
                }
            }
            TrendTieBreak::StrictIncreaseOnly => {
                if newer > older {
                    Trend::Improving
                } else if newer < older {
                    Trend::Declining
                } else {
                    Trend::Stable
                }
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendTieBreak::NonDecreasingImproves => "non_decreasing_improves",
            TrendTieBreak::StrictIncreaseOnly => "strict_increase_only",
        }
    }
}

impl FromStr for TrendTieBreak {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "non_decreasing_improves" | ">=" => Ok(TrendTieBreak::NonDecreasingImproves),
            "strict_increase_only" | ">" => Ok(TrendTieBreak::StrictIncreaseOnly),
            _ => Err(DomainError::InvalidInput(format!(
                "Unknown trend tie-break: {s}"
            ))),
        }
    }
}

/// Knobs for the consistency calculation.
///
/// Calendar days are always derived with `day_offset`; there is exactly one
/// place in the system where an instant becomes a day, and it is here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsistencyPolicy {
    day_offset: FixedOffset,
    tie_break: TrendTieBreak,
    target_entries: u32,
}

impl Default for ConsistencyPolicy {
    fn default() -> Self {
        Self {
            day_offset: Utc.fix(),
            tie_break: TrendTieBreak::default(),
            target_entries: DEFAULT_TARGET_ENTRIES,
        }
    }
}

impl ConsistencyPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day_offset(mut self, offset: FixedOffset) -> Self {
        self.day_offset = offset;
        self
    }

    /// Offset east of UTC in minutes (e.g. `-300` for UTC-05:00).
    pub fn with_day_offset_minutes(self, minutes: i32) -> Result<Self, DomainError> {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "Day offset must be within +/-24h, got {minutes} minutes"
                ))
            })?;
        Ok(self.with_day_offset(offset))
    }

    pub fn with_tie_break(mut self, tie_break: TrendTieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_target_entries(mut self, target_entries: u32) -> Self {
        self.target_entries = target_entries;
        self
    }

    pub fn day_offset(&self) -> FixedOffset {
        self.day_offset
    }

    pub fn tie_break(&self) -> TrendTieBreak {
        self.tie_break
    }

    pub fn target_entries(&self) -> u32 {
        self.target_entries
    }

    /// Calendar day of `instant` in the configured offset.
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.day_offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.day_of(Utc::now())
    }
}
