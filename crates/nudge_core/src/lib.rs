//! Core domain logic for nudge, a local one-shot reminder app.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod manager;
pub mod model;
pub mod sched;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use manager::reminder_manager::{
    CreateError, CreateOutcome, DeleteOutcome, InitReport, ReminderManager,
};
pub use model::reminder::{
    NotificationHandle, Reminder, ReminderId, ReminderValidationError,
};
pub use sched::{
    CancelError, NoopScheduler, NotificationScheduler, PermissionState, ScheduleError,
    ScheduleRequest,
};
pub use store::reminder_store::{
    ReminderStore, SqliteReminderStore, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
