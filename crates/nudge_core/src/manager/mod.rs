//! Reminder lifecycle orchestration.
//!
//! # Responsibility
//! - Own the in-memory reminder list and every mutation path into it.
//! - Keep the list consistent with the store and the external scheduler.

pub mod reminder_manager;
