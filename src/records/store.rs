//! # Record Store
//!
//! A flat collection of [`StoredRecord`]s behind the [`RecordStore`] trait.
//! Refresh cycles replace the whole collection; CRUD routes touch single
//! rows by id.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use super::record::{Record, StoredRecord};

/// Storage operations for agricultural records
pub trait RecordStore: Send + Sync {
    /// All stored rows, in insertion order
    fn all(&self) -> StoreResult<Vec<StoredRecord>>;

    fn get(&self, id: Uuid) -> StoreResult<Option<StoredRecord>>;

    /// Store a new record under a fresh id
    fn insert(&self, record: Record) -> StoreResult<StoredRecord>;

    /// Replace the record stored under `id`
    fn update(&self, id: Uuid, record: Record) -> StoreResult<StoredRecord>;

    fn delete(&self, id: Uuid) -> StoreResult<()>;

    /// Clear the collection, then insert `records`. Returns the new count.
    fn replace_all(&self, records: Vec<Record>) -> StoreResult<usize>;

    fn len(&self) -> StoreResult<usize> {
        Ok(self.all()?.len())
    }

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Row-level edits shared by both store implementations
fn apply_update(rows: &mut [StoredRecord], id: Uuid, record: Record) -> StoreResult<StoredRecord> {
    let row = rows
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or(StoreError::NotFound(id))?;
    row.record = record;
    Ok(row.clone())
}

fn apply_delete(rows: &mut Vec<StoredRecord>, id: Uuid) -> StoreResult<()> {
    let before = rows.len();
    rows.retain(|r| r.id != id);
    if rows.len() == before {
        Err(StoreError::NotFound(id))
    } else {
        Ok(())
    }
}

/// In-memory record store
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    rows: RwLock<Vec<StoredRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_rows(rows: Vec<StoredRecord>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }
}

impl RecordStore for InMemoryRecordStore {
    fn all(&self) -> StoreResult<Vec<StoredRecord>> {
        let rows = self.rows.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(rows.clone())
    }

    fn get(&self, id: Uuid) -> StoreResult<Option<StoredRecord>> {
        let rows = self.rows.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(rows.iter().find(|r| r.id == id).cloned())
    }

    fn insert(&self, record: Record) -> StoreResult<StoredRecord> {
        let mut rows = self.rows.write().map_err(|_| StoreError::LockPoisoned)?;
        let stored = StoredRecord::new(record);
        rows.push(stored.clone());
        Ok(stored)
    }

    fn update(&self, id: Uuid, record: Record) -> StoreResult<StoredRecord> {
        let mut rows = self.rows.write().map_err(|_| StoreError::LockPoisoned)?;
        apply_update(&mut rows, id, record)
    }

    fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut rows = self.rows.write().map_err(|_| StoreError::LockPoisoned)?;
        apply_delete(&mut rows, id)
    }

    fn replace_all(&self, records: Vec<Record>) -> StoreResult<usize> {
        let mut rows = self.rows.write().map_err(|_| StoreError::LockPoisoned)?;
        rows.clear();
        rows.extend(records.into_iter().map(StoredRecord::new));
        Ok(rows.len())
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.rows.read().map_err(|_| StoreError::LockPoisoned)?.len())
    }
}

/// Record store persisted as a single JSON array on disk
///
/// Every mutation is applied to a copy, written to `<file>.tmp`, renamed
/// over the data file, and only then made visible. A failed write leaves
/// both the file and the in-memory view unchanged.
#[derive(Debug)]
pub struct JsonFileRecordStore {
    path: PathBuf,
    cache: InMemoryRecordStore,
}

impl JsonFileRecordStore {
    /// Open the store at `path`, creating an empty collection if the file
    /// does not exist yet
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let rows = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content).map_err(|e| StoreError::Corrupt(e.to_string()))?
            }
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            cache: InMemoryRecordStore::with_rows(rows),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, rows: &[StoredRecord]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_vec_pretty(rows).map_err(|e| StoreError::Io(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn mutate<T>(
        &self,
        edit: impl FnOnce(&mut Vec<StoredRecord>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut rows = self.cache.rows.write().map_err(|_| StoreError::LockPoisoned)?;
        let mut next = rows.clone();
        let out = edit(&mut next)?;
        self.persist(&next)?;
        *rows = next;
        Ok(out)
    }
}

impl RecordStore for JsonFileRecordStore {
    fn all(&self) -> StoreResult<Vec<StoredRecord>> {
        self.cache.all()
    }

    fn get(&self, id: Uuid) -> StoreResult<Option<StoredRecord>> {
        self.cache.get(id)
    }

    fn insert(&self, record: Record) -> StoreResult<StoredRecord> {
        self.mutate(|rows| {
            let stored = StoredRecord::new(record);
            rows.push(stored.clone());
            Ok(stored)
        })
    }

    fn update(&self, id: Uuid, record: Record) -> StoreResult<StoredRecord> {
        self.mutate(|rows| apply_update(rows, id, record))
    }

    fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.mutate(|rows| apply_delete(rows, id))
    }

    fn replace_all(&self, records: Vec<Record>) -> StoreResult<usize> {
        self.mutate(|rows| {
            *rows = records.into_iter().map(StoredRecord::new).collect();
            Ok(rows.len())
        })
    }

    fn len(&self) -> StoreResult<usize> {
        self.cache.len()
    }
}
