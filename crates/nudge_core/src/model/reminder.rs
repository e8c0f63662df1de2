//! Reminder domain model.
//!
//! # Responsibility
//! - Define the canonical record for a one-shot delayed notification request.
//! - Validate raw user input before any external side effect.
//!
//! # Invariants
//! - `id` is stable and never reused for another reminder.
//! - `title` is stored trimmed and non-empty.
//! - `delay_seconds` is strictly positive.
//! - `created_at` is set once at creation and never rewritten.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a reminder record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ReminderId = Uuid;

/// Opaque token issued by the external scheduler for one scheduled
/// notification. Used later to cancel that notification; never interpreted
/// by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationHandle(String);

impl NotificationHandle {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NotificationHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation failure for raw reminder input.
///
/// Raised before any scheduler or store call, so a rejected input has no
/// side effects anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderValidationError {
    /// Title is empty after trimming surrounding whitespace.
    EmptyTitle,
    /// Delay text is not a strictly positive integer number of seconds.
    InvalidDelay { input: String },
}

impl Display for ReminderValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "reminder title must not be empty"),
            Self::InvalidDelay { input } => {
                write!(f, "delay must be a positive whole number of seconds, got `{input}`")
            }
        }
    }
}

impl Error for ReminderValidationError {}

/// Canonical persisted record for one scheduled reminder.
///
/// The list of these records is the single entity this crate persists. A
/// record is only constructed after the external scheduler accepted the
/// request, so `scheduled_handle` is populated for every record created
/// through the manager; it stays optional in the storage shape to tolerate
/// snapshots written by older builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Stable global ID used for lookup and deletion.
    pub id: ReminderId,
    /// User-facing title, trimmed, non-empty.
    pub title: String,
    /// Requested delay between creation and firing, in whole seconds.
    pub delay_seconds: u32,
    /// Token the external scheduler returned for this notification.
    pub scheduled_handle: Option<NotificationHandle>,
    /// Unix epoch milliseconds at creation time.
    pub created_at: i64,
}

impl Reminder {
    /// Creates a reminder record with a generated stable ID.
    ///
    /// Callers must pass an already-validated title and delay; this
    /// constructor does not re-run input validation.
    pub fn new(
        title: impl Into<String>,
        delay_seconds: u32,
        scheduled_handle: NotificationHandle,
        created_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            delay_seconds,
            scheduled_handle: Some(scheduled_handle),
            created_at,
        }
    }
}

/// Validates and normalizes a raw title.
///
/// # Contract
/// - Returns the trimmed title on success.
/// - Rejects input that trims to an empty string.
pub fn validate_title(raw: &str) -> Result<String, ReminderValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ReminderValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// Parses a raw delay text into whole seconds.
///
/// # Contract
/// - Accepts only strictly positive base-10 integers (`"10"`, `" 7 "`).
/// - Rejects zero, negatives, fractions and non-numeric text.
pub fn parse_delay_seconds(raw: &str) -> Result<u32, ReminderValidationError> {
    let trimmed = raw.trim();
    match trimmed.parse::<u32>() {
        Ok(seconds) if seconds > 0 => Ok(seconds),
        _ => Err(ReminderValidationError::InvalidDelay {
            input: raw.to_string(),
        }),
    }
}

/// Current wall-clock time as unix epoch milliseconds.
///
/// Times are carried as epoch millis everywhere in this crate, including the
/// absolute fire time handed to the scheduler.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
