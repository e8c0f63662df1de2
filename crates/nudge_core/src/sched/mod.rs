//! External notification-scheduler boundary.
//!
//! # Responsibility
//! - Define the contract the core uses to schedule and cancel one-shot
//!   notifications and to resolve the permission grant.
//! - Provide a no-op implementation for headless environments.

mod noop;
mod scheduler;

pub use noop::NoopScheduler;
pub use scheduler::{
    CancelError, NotificationScheduler, PermissionState, ScheduleError, ScheduleRequest,
};
