//! Storage abstractions for snapshot persistence.
//!
//! Each record kind lives in its own flat JSON file which is replaced
//! wholesale at the end of every cycle:
//!
//! ```text
//! {dir}/
//! ├── backup_classes.json       # ClassRecord[]
//! └── backup_assignments.json   # AssignmentRecord[]
//! ```
//!
//! A missing or unreadable file is not an error: it loads as an empty
//! collection and the caller treats the cycle as a first run.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{SnapshotKind, SnapshotRecord, StorageConfig};

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Read the stored bytes for `kind`, returning `None` if nothing is stored.
    async fn read_bytes(&self, kind: SnapshotKind) -> Result<Option<Vec<u8>>>;

    /// Replace the stored bytes for `kind` atomically.
    async fn write_bytes(&self, kind: SnapshotKind, bytes: &[u8]) -> Result<()>;

    /// Human-readable location of `kind`, for log lines.
    fn location(&self, kind: SnapshotKind) -> String;
}

/// Why a load did or did not produce a baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Found,
    Missing,
    Corrupt(String),
}

/// A loaded collection plus whether it came from storage.
#[derive(Debug, Clone)]
pub struct LoadedSnapshot<R> {
    pub records: Vec<R>,
    pub status: LoadStatus,
}

impl<R> LoadedSnapshot<R> {
    fn empty(status: LoadStatus) -> Self {
        Self {
            records: Vec::new(),
            status,
        }
    }

    /// True only when a stored collection was read successfully.
    pub fn found(&self) -> bool {
        self.status == LoadStatus::Found
    }
}

/// Load the previous collection for `R`. Never fails.
///
/// A stored `null` is an empty collection, as written for a nil list.
pub async fn load_snapshot<R: SnapshotRecord>(
    storage: &dyn SnapshotStorage,
) -> LoadedSnapshot<R> {
    let bytes = match storage.read_bytes(R::KIND).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return LoadedSnapshot::empty(LoadStatus::Missing),
        Err(e) => return LoadedSnapshot::empty(LoadStatus::Corrupt(e.to_string())),
    };

    match serde_json::from_slice::<Option<Vec<R>>>(&bytes) {
        Ok(records) => LoadedSnapshot {
            records: records.unwrap_or_default(),
            status: LoadStatus::Found,
        },
        Err(e) => LoadedSnapshot::empty(LoadStatus::Corrupt(e.to_string())),
    }
}

/// Persist `records` as the new baseline for `R`.
pub async fn save_snapshot<R: SnapshotRecord>(
    storage: &dyn SnapshotStorage,
    records: &[R],
) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(records)?;
    storage.write_bytes(R::KIND, &bytes).await
}

/// Build the local backend from configuration.
pub fn from_config(config: &StorageConfig) -> LocalStorage {
    LocalStorage::new(&config.dir)
        .with_file(SnapshotKind::Classes, &config.classes_file)
        .with_file(SnapshotKind::Assignments, &config.assignments_file)
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory backend for pipeline tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::error::AppError;

    #[derive(Default)]
    pub struct MemoryStorage {
        pub files: Mutex<HashMap<SnapshotKind, Vec<u8>>>,
        pub fail_writes: bool,
    }

    impl MemoryStorage {
        pub fn get(&self, kind: SnapshotKind) -> Option<Vec<u8>> {
            self.files.lock().unwrap().get(&kind).cloned()
        }
    }

    #[async_trait]
    impl SnapshotStorage for MemoryStorage {
        async fn read_bytes(&self, kind: SnapshotKind) -> Result<Option<Vec<u8>>> {
            Ok(self.get(kind))
        }

        async fn write_bytes(&self, kind: SnapshotKind, bytes: &[u8]) -> Result<()> {
            if self.fail_writes {
                return Err(AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                )));
            }
            self.files.lock().unwrap().insert(kind, bytes.to_vec());
            Ok(())
        }

        fn location(&self, kind: SnapshotKind) -> String {
            format!("memory://{kind}")
        }
    }
}
