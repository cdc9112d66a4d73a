use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::calculator::{CheckInSample, ConsistencyCalculator, ConsistencyMetrics};
use crate::shared::DomainError;

/// Keys accepted for the instant of a record, in lookup order.
const TIMESTAMP_KEYS: [&str; 3] = ["timestamp", "recordedAt", "createdAt"];

impl ConsistencyCalculator {
    /// Metrics over an untyped JSON payload.
    ///
    /// The payload must be an array of objects that each carry a timestamp;
    /// anything else is a caller bug and yields `InvalidInput`. Timestamps
    /// without an offset (`2024-06-15T08:00:00`, `2024-06-15`) are read in
    /// the policy's day offset. A missing or non-numeric `value` is read as 0;
    /// numeric strings such as `"5"` count as numbers.
    pub fn calculate_json(
        &self,
        payload: &Value,
        today: NaiveDate,
    ) -> Result<ConsistencyMetrics, DomainError> {
        let samples = samples_from_json(payload, self.policy().day_offset())?;
        Ok(self.calculate_at(&samples, today))
    }
}

/// `day_offset` places timestamps that carry no offset of their own.
pub fn samples_from_json(
    payload: &Value,
    day_offset: FixedOffset,
) -> Result<Vec<CheckInSample>, DomainError> {
    let items = payload.as_array().ok_or_else(|| {
        DomainError::InvalidInput(format!(
            "Expected an array of check-ins, got {}",
            json_type_name(payload)
        ))
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| sample_from_json(index, item, day_offset))
        .collect()
}

fn sample_from_json(
    index: usize,
    item: &Value,
    day_offset: FixedOffset,
) -> Result<CheckInSample, DomainError> {
    let object = item.as_object().ok_or_else(|| {
        DomainError::InvalidInput(format!(
            "Check-in #{index} must be an object, got {}",
            json_type_name(item)
        ))
    })?;

    let raw = TIMESTAMP_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .ok_or_else(|| DomainError::InvalidInput(format!("Check-in #{index} has no timestamp")))?;

    let recorded_at = parse_timestamp(raw, day_offset).ok_or_else(|| {
        DomainError::InvalidInput(format!(
            "Check-in #{index} has an invalid timestamp '{raw}'"
        ))
    })?;

    let value = object.get("value").and_then(numeric_value);

    Ok(CheckInSample::new(recorded_at, value))
}

/// RFC 3339 first, then a naive date-time or bare date in `day_offset`.
fn parse_timestamp(raw: &str, day_offset: FixedOffset) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    naive
        .and_local_timezone(day_offset)
        .single()
        .map(|instant| instant.with_timezone(&Utc))
}

// Decimal columns often arrive as strings
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
