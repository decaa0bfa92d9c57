// src/pipeline/cycle.rs

//! One fetch → diff → notify → save cycle.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{AssignmentRecord, ClassRecord, Config, SnapshotKind, SnapshotRecord};
use crate::pipeline::{DiffReport, TermWindow, calculate_diff, project};
use crate::services::{Notifier, StudentSource, notifier, source};
use crate::storage::{self, LoadStatus, SnapshotStorage, load_snapshot, save_snapshot};

/// What a completed cycle did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub class_changes: usize,
    pub assignment_changes: usize,
    /// Messages the notifier accepted
    pub notifications_sent: usize,
    /// Snapshot kinds that could not be persisted
    pub save_failures: Vec<SnapshotKind>,
}

/// Owns the collaborators of the polling pipeline.
pub struct Watcher {
    source: Box<dyn StudentSource>,
    notifier: Box<dyn Notifier>,
    storage: Box<dyn SnapshotStorage>,
    term_prefix: String,
}

impl Watcher {
    pub fn new(
        source: Box<dyn StudentSource>,
        notifier: Box<dyn Notifier>,
        storage: Box<dyn SnapshotStorage>,
        term_prefix: impl Into<String>,
    ) -> Self {
        Self {
            source,
            notifier,
            storage,
            term_prefix: term_prefix.into(),
        }
    }

    /// Wire up the configured source, notifier and local storage.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            source::from_config(&config.source)?,
            notifier::from_config(&config.notifier)?,
            Box::new(storage::from_config(&config.storage)),
            config.schedule.term_prefix.clone(),
        ))
    }

    /// Snapshot storage backing this watcher.
    pub fn storage(&self) -> &dyn SnapshotStorage {
        &*self.storage
    }

    /// Run one cycle at the current time.
    pub async fn run_cycle(&self) -> Result<CycleSummary> {
        self.run_cycle_at(Utc::now()).await
    }

    /// Run one cycle as if the current time were `now`.
    ///
    /// A fetch failure aborts before anything is diffed or saved. Notifier
    /// and save failures are logged and do not abort the cycle.
    pub async fn run_cycle_at(&self, now: DateTime<Utc>) -> Result<CycleSummary> {
        log::info!("Starting data fetch and comparison...");

        let old_classes = load_snapshot::<ClassRecord>(self.storage()).await;
        self.log_load(SnapshotKind::Classes, &old_classes.status);
        let old_assignments = load_snapshot::<AssignmentRecord>(self.storage()).await;
        self.log_load(SnapshotKind::Assignments, &old_assignments.status);

        let student = match self.source.fetch().await {
            Ok(student) => student,
            Err(e) => {
                log::error!("Failed to get student data: {}", e);
                return Err(e);
            }
        };

        let window = TermWindow::select(&student.reporting_terms, now, &self.term_prefix);
        if window.is_empty() {
            log::info!("No active '{}' term; no records in scope", self.term_prefix);
        } else {
            log::debug!(
                "Active terms {:?}, window {} .. {}",
                window.active_terms,
                window.begin,
                window.end
            );
        }

        let current = project(&student, &window);
        log::debug!(
            "Projected {} class(es), {} assignment(s)",
            current.classes.len(),
            current.assignments.len()
        );

        let mut summary = CycleSummary::default();

        let class_report = calculate_diff(&old_classes.records, &current.classes);
        summary.class_changes = class_report.change_count();
        summary.notifications_sent += self.dispatch(SnapshotKind::Classes, &class_report).await;

        let assignment_report = calculate_diff(&old_assignments.records, &current.assignments);
        summary.assignment_changes = assignment_report.change_count();
        summary.notifications_sent += self
            .dispatch(SnapshotKind::Assignments, &assignment_report)
            .await;

        if !self.persist(&current.classes).await {
            summary.save_failures.push(SnapshotKind::Classes);
        }
        if !self.persist(&current.assignments).await {
            summary.save_failures.push(SnapshotKind::Assignments);
        }

        log::info!("Data fetch and comparison completed.");
        Ok(summary)
    }

    fn log_load(&self, kind: SnapshotKind, status: &LoadStatus) {
        match status {
            LoadStatus::Found => {}
            LoadStatus::Missing => {
                log::warn!("Could not load old {}, possibly first run.", kind)
            }
            LoadStatus::Corrupt(reason) => log::warn!(
                "Could not read old {} from {} ({}); treating as first run.",
                kind,
                self.storage.location(kind),
                reason
            ),
        }
    }

    /// Send the joined report; returns 1 if a message was delivered.
    async fn dispatch(&self, kind: SnapshotKind, report: &DiffReport) -> usize {
        let Some(message) = report.message() else {
            log::info!("No changes in {}.", kind);
            return 0;
        };

        log::info!("{} change(s) in {}", report.change_count(), kind);
        match self.notifier.send(&message).await {
            Ok(()) => 1,
            Err(e) => {
                log::error!("Failed to deliver {} notification: {}", kind, e);
                0
            }
        }
    }

    async fn persist<R: SnapshotRecord>(&self, records: &[R]) -> bool {
        match save_snapshot(self.storage(), records).await {
            Ok(()) => true,
            Err(e) => {
                log::error!(
                    "Failed to backup new {} data to {}: {}",
                    R::KIND,
                    self.storage.location(R::KIND),
                    e
                );
                false
            }
        }
    }
}
