//! Diff calculation between two snapshot generations.
//!
//! Reconciles the previous and current collections of one record kind by id
//! and classifies every difference as added, removed or grade-changed.
//! Classes and assignments are diffed independently and reported as separate
//! messages.

use std::collections::HashMap;
use std::fmt;

use crate::models::{SnapshotKind, SnapshotRecord};

/// What happened to a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Present now, absent before
    Added { grade: String },
    /// Present before, absent now
    Removed,
    /// Present in both with different grade strings
    GradeChanged { old: String, new: String },
}

/// One change event, carrying enough context to render a notification line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: SnapshotKind,
    pub id: i64,
    pub name: String,
    /// Owning class name for assignments
    pub class_name: Option<String>,
    pub change: Change,
}

impl ChangeEvent {
    fn from_record<R: SnapshotRecord>(record: &R, change: Change) -> Self {
        Self {
            kind: R::KIND,
            id: record.id(),
            name: record.name().to_string(),
            class_name: record.class_context().map(str::to_string),
            change,
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = self.class_name.as_deref().unwrap_or_default();
        match (self.kind, &self.change) {
            (SnapshotKind::Classes, Change::GradeChanged { old, new }) => {
                write!(f, "Grade changed for {}: {} -> {}", self.name, old, new)
            }
            (SnapshotKind::Classes, Change::Added { grade }) => {
                write!(f, "New class added: {} with grade {}", self.name, grade)
            }
            (SnapshotKind::Classes, Change::Removed) => {
                write!(f, "Class removed: {}", self.name)
            }
            (SnapshotKind::Assignments, Change::GradeChanged { old, new }) => write!(
                f,
                "Grade changed for assignment '{}' in class {}: {} -> {}",
                self.name, class, old, new
            ),
            (SnapshotKind::Assignments, Change::Added { grade }) => write!(
                f,
                "New assignment added: '{}' in class {} with grade {}",
                self.name, class, grade
            ),
            (SnapshotKind::Assignments, Change::Removed) => write!(
                f,
                "Assignment removed: '{}' from class {}",
                self.name, class
            ),
        }
    }
}

/// Outcome of diffing one record kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffReport {
    /// Nothing to notify about
    NoChanges,
    /// At least one event, in emission order
    Changes(Vec<ChangeEvent>),
}

impl DiffReport {
    fn from_events(events: Vec<ChangeEvent>) -> Self {
        if events.is_empty() {
            Self::NoChanges
        } else {
            Self::Changes(events)
        }
    }

    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        matches!(self, Self::Changes(_))
    }

    /// Get the total number of changes.
    pub fn change_count(&self) -> usize {
        self.events().len()
    }

    /// Events in emission order (empty for `NoChanges`).
    pub fn events(&self) -> &[ChangeEvent] {
        match self {
            Self::NoChanges => &[],
            Self::Changes(events) => events,
        }
    }

    /// All events joined into one multi-line notification, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::NoChanges => None,
            Self::Changes(events) => Some(
                events
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
        }
    }
}

/// Diff `previous` against `current` by record id.
///
/// Events follow the iteration order of `current`, then removals in the
/// order they appear in `previous`. Neither input is modified. An id that
/// repeats within one collection is represented by its last occurrence.
pub fn calculate_diff<R: SnapshotRecord>(previous: &[R], current: &[R]) -> DiffReport {
    let index = last_positions(previous);
    let latest = last_positions(current);
    let mut accounted = vec![false; previous.len()];
    let mut events = Vec::new();

    for (cur, record) in current.iter().enumerate() {
        if latest.get(&record.id()) != Some(&cur) {
            continue;
        }
        match index.get(&record.id()) {
            Some(&pos) => {
                let old = &previous[pos];
                if old.grade() != record.grade() {
                    events.push(ChangeEvent::from_record(
                        record,
                        Change::GradeChanged {
                            old: old.grade().to_string(),
                            new: record.grade().to_string(),
                        },
                    ));
                }
                accounted[pos] = true;
            }
            None => events.push(ChangeEvent::from_record(
                record,
                Change::Added {
                    grade: record.grade().to_string(),
                },
            )),
        }
    }

    for (pos, record) in previous.iter().enumerate() {
        let indexed = index.get(&record.id()) == Some(&pos);
        if indexed && !accounted[pos] {
            events.push(ChangeEvent::from_record(record, Change::Removed));
        }
    }

    DiffReport::from_events(events)
}

/// Map each id to the position of its last occurrence.
fn last_positions<R: SnapshotRecord>(records: &[R]) -> HashMap<i64, usize> {
    records
        .iter()
        .enumerate()
        .map(|(pos, record)| (record.id(), pos))
        .collect()
}
