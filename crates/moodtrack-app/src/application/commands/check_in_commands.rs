use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::commands::command_handler::Command;
use crate::application::dtos::CheckInDto;

/// Record a single check-in for a subject
#[derive(Debug, Clone)]
pub struct RecordCheckInCommand {
    pub subject_id: String,
    pub kind: String,
    pub value: Option<f64>,
    pub note: Option<String>,
    /// Defaults to now
    pub recorded_at: Option<DateTime<Utc>>,
}

impl Command for RecordCheckInCommand {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordCheckInResult {
    pub check_in: CheckInDto,
    /// Stored on the offline queue instead of the database
    pub queued: bool,
    /// Stored check-ins for the subject after this one; absent when queued
    /// or when the count could not be read
    pub subject_total: Option<u64>,
}

/// Replay queued check-ins into the repository
#[derive(Debug, Clone, Default)]
pub struct SyncOfflineQueueCommand;

impl Command for SyncOfflineQueueCommand {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOfflineQueueResult {
    pub synced: usize,
    /// Already stored under the same id; dropped from the queue
    pub already_present: usize,
    pub failed: usize,
    pub remaining: usize,
}
