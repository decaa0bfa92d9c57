//! Service layer for the grade watcher.
//!
//! - Upstream data fetching (`StudentSource`)
//! - Change notification delivery (`Notifier`)

pub mod notifier;
pub mod source;

pub use notifier::{LogNotifier, Notifier, WebhookNotifier};
pub use source::{FileStudentSource, HttpStudentSource, StudentSource};
