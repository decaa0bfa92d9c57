//! Snapshot record types.
//!
//! Field names on disk match the backup files written by earlier
//! deployments (`ID`, `Name`, `Grade`, `ClassID`, `ClassName`), so an
//! existing snapshot is picked up as the baseline without migration.

use std::fmt;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// The two independently persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKind {
    Classes,
    Assignments,
}

impl SnapshotKind {
    /// Lowercase plural label used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            SnapshotKind::Classes => "classes",
            SnapshotKind::Assignments => "assignments",
        }
    }
}

impl fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A record that can be persisted in a snapshot and reconciled by id.
pub trait SnapshotRecord: Clone + Serialize + DeserializeOwned + Send + Sync {
    /// Which collection this record type belongs to.
    const KIND: SnapshotKind;

    /// Stable identity across snapshot generations.
    fn id(&self) -> i64;

    /// Display name.
    fn name(&self) -> &str;

    /// Opaque grade string, compared verbatim.
    fn grade(&self) -> &str;

    /// Owning class name, for records that live inside a class.
    fn class_context(&self) -> Option<&str> {
        None
    }
}

/// Course-section grade for the active term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassRecord {
    /// Section id
    #[serde(rename = "ID")]
    pub id: i64,

    /// Course title
    #[serde(rename = "Name")]
    pub name: String,

    /// Final grade as reported upstream
    #[serde(rename = "Grade")]
    pub grade: String,
}

impl ClassRecord {
    pub fn new(id: i64, name: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            grade: grade.into(),
        }
    }
}

impl SnapshotRecord for ClassRecord {
    const KIND: SnapshotKind = SnapshotKind::Classes;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn grade(&self) -> &str {
        &self.grade
    }
}

/// A graded assignment inside the active term window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignmentRecord {
    /// Assignment id
    #[serde(rename = "ID")]
    pub id: i64,

    /// Assignment title
    #[serde(rename = "Name")]
    pub name: String,

    /// Formatted score, e.g. `"93%"`
    #[serde(rename = "Grade")]
    pub grade: String,

    /// Section id of the owning class
    #[serde(rename = "ClassID")]
    pub class_id: i64,

    /// Owning class title (empty if the section was not projected)
    #[serde(rename = "ClassName")]
    pub class_name: String,
}

impl SnapshotRecord for AssignmentRecord {
    const KIND: SnapshotKind = SnapshotKind::Assignments;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn grade(&self) -> &str {
        &self.grade
    }

    fn class_context(&self) -> Option<&str> {
        Some(&self.class_name)
    }
}

/// One generation of projected records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub classes: Vec<ClassRecord>,
    pub assignments: Vec<AssignmentRecord>,
}
