//! Pipeline stages for one polling cycle.
//!
//! - `TermWindow`: select active quarter terms and their date range
//! - `project`: build class/assignment records for the window
//! - `calculate_diff`: reconcile two snapshot generations
//! - `Watcher`: run load → fetch → diff → notify → save
//! - `run_schedule`: repeat cycles on a fixed interval

pub mod cycle;
pub mod diff;
pub mod project;
pub mod schedule;
pub mod term;

pub use cycle::{CycleSummary, Watcher};
pub use diff::{Change, ChangeEvent, DiffReport, calculate_diff};
pub use project::project;
pub use schedule::run_schedule;
pub use term::TermWindow;
