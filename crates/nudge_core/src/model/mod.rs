//! Domain model types for nudge core.
//!
//! # Responsibility
//! - Define the canonical persisted reminder record.
//! - Provide input validation shared by all creation paths.

pub mod reminder;
