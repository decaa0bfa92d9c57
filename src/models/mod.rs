// src/models/mod.rs

//! Domain models for the grade watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod record;
mod student;

// Re-export all public types
pub use config::{
    Config, ENV_PASSWORD, ENV_USERNAME, ENV_WEBHOOK_URL, NotifierConfig, ScheduleConfig,
    SourceConfig, StorageConfig,
};
pub use record::{AssignmentRecord, ClassRecord, Snapshot, SnapshotKind, SnapshotRecord};
pub use student::{
    Assignment, AssignmentScore, FinalGrade, ReportingTerm, Section, StudentData, parse_instant,
};
