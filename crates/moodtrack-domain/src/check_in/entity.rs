use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value_objects::CheckInKind;
use crate::consistency::CheckInLike;
use crate::shared::{CheckInId, DomainError, SubjectId};

pub const MAX_NOTE_CHARS: usize = 10_000;

/// A single timestamped mood / stress / journal record for one subject.
///
/// Check-ins are immutable once created; the only way to change history is
/// to append a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckIn {
    id: CheckInId,
    subject_id: SubjectId,
    kind: CheckInKind,
    value: Option<f64>,
    note: Option<String>,
    recorded_at: DateTime<Utc>,
}

impl CheckIn {
    /// Create a new check-in, validating the caller-supplied fields.
    pub fn new(
        subject_id: SubjectId,
        kind: CheckInKind,
        value: Option<f64>,
        note: Option<String>,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if subject_id.is_blank() {
            return Err(DomainError::Validation(
                "Subject id cannot be empty".to_string(),
            ));
        }

        if let Some(v) = value {
            if !v.is_finite() {
                return Err(DomainError::Validation(format!(
                    "Check-in value must be a finite number, got {v}"
                )));
            }
        }

        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        if kind.requires_note() && note.is_none() {
            return Err(DomainError::Validation(
                "Journal check-in requires a note".to_string(),
            ));
        }

        if let Some(n) = &note {
            if n.chars().count() > MAX_NOTE_CHARS {
                return Err(DomainError::Validation(format!(
                    "Note exceeds {MAX_NOTE_CHARS} characters"
                )));
            }
        }

        Ok(Self {
            id: CheckInId::new(),
            subject_id,
            kind,
            value,
            note,
            recorded_at,
        })
    }

    /// Restore from persistence
    pub fn restore(
        id: CheckInId,
        subject_id: SubjectId,
        kind: CheckInKind,
        value: Option<f64>,
        note: Option<String>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            subject_id,
            kind,
            value,
            note,
            recorded_at,
        }
    }

    // Getters
    pub fn id(&self) -> &CheckInId {
        &self.id
    }

    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    pub fn kind(&self) -> CheckInKind {
        self.kind
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

impl CheckInLike for CheckIn {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    fn value(&self) -> Option<f64> {
        self.value
    }
}
