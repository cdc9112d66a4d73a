//! Check-in streak and consistency metrics.
//!
//! Everything here is pure: callers load a subject's check-ins from wherever
//! they live and hand them over as a slice. No I/O, no shared state.

mod calculator;
mod daily;
mod json;
mod policy;


pub use calculator::{CheckInLike, CheckInSample, ConsistencyCalculator, ConsistencyMetrics};
pub use daily::{group_by_day, DailyCheckIns};
pub use json::samples_from_json;
pub use policy::{ConsistencyPolicy, Trend, TrendTieBreak, DEFAULT_TARGET_ENTRIES};
