use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::DomainError;

/// What a check-in records. All kinds carry the same scalar `value`; its scale
/// depends on the kind (mood 1-10, stress assessment score, journal sentiment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInKind {
    Mood,
    Stress,
    Journal,
}

impl CheckInKind {
    pub const ALL: [CheckInKind; 3] = [CheckInKind::Mood, CheckInKind::Stress, CheckInKind::Journal];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckInKind::Mood => "mood",
            CheckInKind::Stress => "stress",
            CheckInKind::Journal => "journal",
        }
    }

    /// Journal entries are free text first; the score is optional.
    pub fn requires_note(&self) -> bool {
        matches!(self, CheckInKind::Journal)
    }
}

impl FromStr for CheckInKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mood" => Ok(CheckInKind::Mood),
            "stress" => Ok(CheckInKind::Stress),
            "journal" => Ok(CheckInKind::Journal),
            other => Err(DomainError::InvalidInput(format!(
                "Unknown check-in kind: {other}"
            ))),
        }
    }
}

impl fmt::Display for CheckInKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
