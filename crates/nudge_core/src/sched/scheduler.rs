//! Scheduler adapter contract.
//!
//! # Responsibility
//! - Describe what the core needs from the platform notification service:
//!   schedule one-shot, cancel by handle, permission state, device check.
//!
//! # Invariants
//! - `schedule` takes an absolute fire time, never a relative offset, so a
//!   deferred or internally retried call cannot drift the firing moment.
//! - Handles are opaque; the core never derives meaning from their content.
//! - Delivery is fire-and-forget: no callback path exists from the platform
//!   back into this crate, so a pending handle is optimistic, not
//!   authoritative.

use crate::model::reminder::NotificationHandle;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Notification permission grant as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    /// The user has not been asked yet.
    Undetermined,
}

impl PermissionState {
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl Display for PermissionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Undetermined => "undetermined",
        };
        write!(f, "{label}")
    }
}

/// One-shot notification request handed to the platform scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    /// Notification title shown to the user.
    pub title: String,
    /// Generated body line accompanying the title.
    pub body: String,
    /// Absolute firing moment, unix epoch milliseconds.
    pub fire_at_epoch_ms: i64,
}

/// The external scheduler refused or failed a schedule request.
#[derive(Debug)]
pub enum ScheduleError {
    /// Platform-side failure, carried as the platform's own message.
    Backend(String),
}

impl Display for ScheduleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(message) => write!(f, "scheduling failed: {message}"),
        }
    }
}

impl Error for ScheduleError {}

/// The external scheduler failed to cancel a previously issued handle.
///
/// Non-fatal to callers: the lifecycle manager logs it and proceeds.
#[derive(Debug)]
pub enum CancelError {
    Backend(String),
}

impl Display for CancelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(message) => write!(f, "cancellation failed: {message}"),
        }
    }
}

impl Error for CancelError {}

/// Platform notification-scheduling boundary.
///
/// Implementations wrap whatever the host platform offers (or a test
/// double); the core only ever talks to this trait.
pub trait NotificationScheduler {
    /// Reports the current permission grant without prompting.
    fn permission_state(&self) -> PermissionState;

    /// Prompts the user if needed and returns the terminal grant state.
    fn request_permission(&mut self) -> PermissionState;

    /// Schedules a one-shot notification for an absolute moment.
    ///
    /// Returns an opaque handle usable later with [`Self::cancel`].
    fn schedule(&mut self, request: &ScheduleRequest) -> Result<NotificationHandle, ScheduleError>;

    /// Cancels a previously scheduled notification, best-effort.
    fn cancel(&mut self, handle: &NotificationHandle) -> Result<(), CancelError>;

    /// Whether this process runs on hardware where timed delivery is
    /// expected to be reliable (emulators and headless hosts are not).
    fn is_physical_device(&self) -> bool;
}
