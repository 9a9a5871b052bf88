//! Record store: a JSON-document collection persisted to a single file.
//!
//! The full collection is held in memory behind an `RwLock` and every
//! mutation is re-serialized to the backing file. Identity assignment,
//! model validation and `rollNo` uniqueness are enforced here, on the
//! write path.

use crate::logger;
use crate::model::{StudentId, StudentInput, StudentRecord, ValidationError};
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation failure.
#[derive(Debug)]
pub enum StoreError {
    /// Model constraint violated, including `rollNo` uniqueness.
    Validation(ValidationError),
    /// No record with the given identity.
    NotFound(StudentId),
    /// The backing file could not be written.
    Persist(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "student not found: {id}"),
            Self::Persist(message) => write!(f, "{message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) | Self::Persist(_) => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Document store for the student collection.
///
/// Constructed once at startup and handed to `AppState`; tests use
/// [`StudentStore::in_memory`] for an isolated fixture store.
pub struct StudentStore {
    /// Backing file; `None` keeps the collection in memory only.
    path: Option<PathBuf>,
    records: RwLock<Vec<StudentRecord>>,
}

impl StudentStore {
    /// Opens the store backed by the given file.
    ///
    /// A missing file starts an empty collection. A file that cannot be
    /// read or parsed is logged and the process continues with an empty
    /// collection; later writes will recreate the file.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let records = match load_records(&path) {
            Ok(records) => {
                logger::log_store_opened(&path, records.len());
                records
            }
            Err(err) => {
                logger::log_store_error(&path, &err);
                Vec::new()
            }
        };
        Self {
            path: Some(path),
            records: RwLock::new(records),
        }
    }

    /// Store with no backing file, for tests.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            records: RwLock::new(Vec::new()),
        }
    }

    /// Returns every record in storage order.
    pub async fn list_all(&self) -> Vec<StudentRecord> {
        self.records.read().await.clone()
    }

    /// Validates and persists a new record, returning the stored copy.
    pub async fn create(&self, input: StudentInput) -> StoreResult<StudentRecord> {
        let mut records = self.records.write().await;
        let record = StudentRecord::create(input)?;
        if records
            .iter()
            .any(|existing| existing.roll_no == record.roll_no)
        {
            return Err(ValidationError::DuplicateRollNo(record.roll_no).into());
        }
        records.push(record.clone());
        self.save(&records)?;
        Ok(record)
    }

    /// Partially replaces fields on the addressed record.
    pub async fn update_by_id(
        &self,
        id: StudentId,
        input: StudentInput,
    ) -> StoreResult<StudentRecord> {
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|record| record.id == id)
            .ok_or(StoreError::NotFound(id))?;

        // Re-validate on a working copy so a failed update leaves the
        // stored record untouched
        let mut updated = records[position].clone();
        updated.apply(input)?;
        if records
            .iter()
            .any(|other| other.id != id && other.roll_no == updated.roll_no)
        {
            return Err(ValidationError::DuplicateRollNo(updated.roll_no).into());
        }

        records[position] = updated.clone();
        self.save(&records)?;
        Ok(updated)
    }

    /// Removes the addressed record. Hard delete, no tombstone.
    pub async fn delete_by_id(&self, id: StudentId) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|record| record.id == id)
            .ok_or(StoreError::NotFound(id))?;
        records.remove(position);
        self.save(&records)?;
        Ok(())
    }

    /// Writes the whole collection back to the backing file.
    fn save(&self, records: &[StudentRecord]) -> StoreResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(records).map_err(|e| {
            StoreError::Persist(format!("failed to serialize student collection: {e}"))
        })?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Persist(format!(
                        "failed to create {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }
        fs::write(path, json)
            .map_err(|e| StoreError::Persist(format!("failed to write {}: {e}", path.display())))
    }
}

/// Reads the collection from disk; an absent file is an empty collection.
fn load_records(path: &Path) -> Result<Vec<StudentRecord>, String> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&content).map_err(|e| format!("failed to parse {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(roll_no: &str, full_name: &str) -> StudentInput {
        StudentInput {
            roll_no: Some(roll_no.to_string()),
            full_name: Some(full_name.to_string()),
            ..StudentInput::default()
        }
    }

    #[tokio::test]
    async fn test_list_empty_collection() {
        let store = StudentStore::in_memory();
        assert!(store.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let store = StudentStore::in_memory();
        let created = store.create(input("A1", "Ada Lovelace")).await.unwrap();
        let listed = store.list_all().await;
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_roll_no() {
        let store = StudentStore::in_memory();
        store.create(input("A1", "Ada Lovelace")).await.unwrap();
        let err = store.create(input("A1", "Grace Hopper")).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::DuplicateRollNo(_))
        ));
        assert_eq!(store.list_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_refreshes_timestamp_and_keeps_other_fields() {
        let store = StudentStore::in_memory();
        let created = store
            .create(StudentInput {
                semester: Some(4),
                department: Some("Physics".to_string()),
                ..input("A1", "Ada Lovelace")
            })
            .await
            .unwrap();

        std::thread::sleep(std::time::Duration::from_millis(2));
        let updated = store
            .update_by_id(
                created.id,
                StudentInput {
                    full_name: Some("Grace Hopper".to_string()),
                    ..StudentInput::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.full_name, "Grace Hopper");
        assert_eq!(updated.roll_no, created.roll_no);
        assert_eq!(updated.department, created.department);
        assert_eq!(updated.semester, created.semester);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let store = StudentStore::in_memory();
        let err = store
            .update_by_id(StudentId::new_v4(), input("A1", "Ada Lovelace"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_roll_no_collision() {
        let store = StudentStore::in_memory();
        store.create(input("A1", "Ada Lovelace")).await.unwrap();
        let second = store.create(input("A2", "Grace Hopper")).await.unwrap();

        let err = store
            .update_by_id(
                second.id,
                StudentInput {
                    roll_no: Some("A1".to_string()),
                    ..StudentInput::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::DuplicateRollNo(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_update_leaves_record_unchanged() {
        let store = StudentStore::in_memory();
        let created = store.create(input("A1", "Ada Lovelace")).await.unwrap();

        let err = store
            .update_by_id(
                created.id,
                StudentInput {
                    semester: Some(13),
                    full_name: Some("Grace Hopper".to_string()),
                    ..StudentInput::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.list_all().await, vec![created]);
    }

    #[tokio::test]
    async fn test_delete_twice_reports_not_found() {
        let store = StudentStore::in_memory();
        let created = store.create(input("A1", "Ada Lovelace")).await.unwrap();

        store.delete_by_id(created.id).await.unwrap();
        let err = store.delete_by_id(created.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(store.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_collection_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");

        let created = {
            let store = StudentStore::open(&path);
            store.create(input("A1", "Ada Lovelace")).await.unwrap()
        };

        let reopened = StudentStore::open(&path);
        assert_eq!(reopened.list_all().await, vec![created]);
    }

    #[tokio::test]
    async fn test_corrupt_file_degrades_to_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");
        fs::write(&path, "not json").unwrap();

        let store = StudentStore::open(&path);
        assert!(store.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_open_creates_parent_directory_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("students.json");

        let store = StudentStore::open(&path);
        store.create(input("A1", "Ada Lovelace")).await.unwrap();
        assert!(path.is_file());
    }
}
