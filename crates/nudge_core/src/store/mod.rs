//! Durable persistence boundary for the reminder list.
//!
//! # Responsibility
//! - Hold the serialized reminder snapshot across process restarts.
//! - Keep SQL details inside the core persistence boundary.

pub mod reminder_store;
