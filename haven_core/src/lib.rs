#![forbid(unsafe_code)]

//! Core logic for Haven, a PTSD self-help companion.
//!
//! This crate provides:
//! - The DBT/CBT technique catalog and the keyword technique matcher
//! - Daily affirmation selection
//! - Journal persistence (mood logs, technique usage, safety plan)
//! - Progress statistics, reminder schedules and crisis resources
//! - Request plumbing for the chat assistant

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod matcher;
pub mod reminders;
pub mod crisis;
pub mod store;
pub mod validation;
pub mod journal;
pub mod progress;
pub mod schedule;
pub mod chat;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, default_catalog};
pub use config::Config;
pub use matcher::suggest_techniques;
pub use reminders::{daily_reminder, random_reminder};
pub use crisis::{CrisisResource, CRISIS_RESOURCES};
pub use store::{JsonFileStore, KeyValueStore, KeyValueStoreExt, MemoryStore};
pub use progress::ProgressSummary;
pub use schedule::{Medication, ReminderSchedule, Trigger};
