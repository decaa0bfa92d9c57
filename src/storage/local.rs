//! Local filesystem storage implementation.
//!
//! Writes go to a `.tmp` sibling first and are renamed over the target, so a
//! crash mid-write leaves the previous snapshot intact for the next cycle.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::SnapshotKind;
use crate::storage::SnapshotStorage;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    files: HashMap<SnapshotKind, String>,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        let files = HashMap::from([
            (SnapshotKind::Classes, "backup_classes.json".to_string()),
            (SnapshotKind::Assignments, "backup_assignments.json".to_string()),
        ]);
        Self {
            root_dir: root_dir.into(),
            files,
        }
    }

    /// Override the file name used for `kind`.
    pub fn with_file(mut self, kind: SnapshotKind, file_name: impl Into<String>) -> Self {
        self.files.insert(kind, file_name.into());
        self
    }

    /// Root directory of the snapshot files.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Get the full path for a snapshot kind.
    pub fn path(&self, kind: SnapshotKind) -> PathBuf {
        let file_name = self
            .files
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| format!("backup_{}.json", kind.label()));
        self.root_dir.join(file_name)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotStorage for LocalStorage {
    async fn read_bytes(&self, kind: SnapshotKind) -> Result<Option<Vec<u8>>> {
        let path = self.path(kind);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, kind: SnapshotKind, bytes: &[u8]) -> Result<()> {
        let path = self.path(kind);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    fn location(&self, kind: SnapshotKind) -> String {
        self.path(kind).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssignmentRecord, ClassRecord};
    use crate::storage::{LoadStatus, load_snapshot, save_snapshot};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage
            .write_bytes(SnapshotKind::Classes, b"[]")
            .await
            .unwrap();
        let data = storage.read_bytes(SnapshotKind::Classes).await.unwrap();
        assert_eq!(data, Some(b"[]".to_vec()));
        assert!(tmp.path().join("backup_classes.json").exists());
        assert!(!tmp.path().join("backup_classes.tmp").exists());
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let data = storage.read_bytes(SnapshotKind::Assignments).await.unwrap();
        assert!(data.is_none());
    }

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("nested/state"));

        save_snapshot(&storage, &[ClassRecord::new(3, "Chemistry", "B-")])
            .await
            .unwrap();

        let loaded = load_snapshot::<ClassRecord>(&storage).await;
        assert!(loaded.found());
        assert_eq!(loaded.records, vec![ClassRecord::new(3, "Chemistry", "B-")]);
    }

    #[tokio::test]
    async fn test_save_replaces_whole_collection() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let first: Vec<ClassRecord> = (1..=5)
            .map(|i| ClassRecord::new(i, format!("Class {i}"), "A"))
            .collect();
        save_snapshot(&storage, &first).await.unwrap();
        save_snapshot(&storage, &first[..1]).await.unwrap();

        let loaded = load_snapshot::<ClassRecord>(&storage).await;
        assert_eq!(loaded.records, first[..1].to_vec());
    }

    #[tokio::test]
    async fn test_custom_file_names() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path())
            .with_file(SnapshotKind::Assignments, "work.json");

        let records = vec![AssignmentRecord {
            id: 5,
            name: "Lab".into(),
            grade: "100%".into(),
            class_id: 3,
            class_name: "Chemistry".into(),
        }];
        save_snapshot(&storage, &records).await.unwrap();

        assert!(tmp.path().join("work.json").exists());
        assert_eq!(
            storage.location(SnapshotKind::Assignments),
            tmp.path().join("work.json").display().to_string()
        );
    }

    #[tokio::test]
    async fn test_truncated_file_is_corrupt_not_error() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        std::fs::write(tmp.path().join("backup_classes.json"), "[{\"ID\": 1,").unwrap();

        let loaded = load_snapshot::<ClassRecord>(&storage).await;
        assert!(matches!(loaded.status, LoadStatus::Corrupt(_)));
        assert!(loaded.records.is_empty());
    }
}
