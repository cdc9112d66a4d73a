use serde::{Deserialize, Serialize};

use moodtrack_domain::check_in::CheckIn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInDto {
    pub id: String,
    pub subject_id: String,
    pub kind: String,
    pub value: Option<f64>,
    pub note: Option<String>,
    pub recorded_at: String, // RFC 3339, UTC
}

impl From<&CheckIn> for CheckInDto {
    fn from(check_in: &CheckIn) -> Self {
        Self {
            id: check_in.id().to_string(),
            subject_id: check_in.subject_id().to_string(),
            kind: check_in.kind().as_str().to_string(),
            value: check_in.value(),
            note: check_in.note().map(str::to_string),
            recorded_at: check_in.recorded_at().to_rfc3339(),
        }
    }
}
