//! Record-store collaborator.
//!
//! The store is append-only: records are inserted into a named [`Collection`] and listed back
//! newest first. Two implementations ship with the crate: [`MemoryRecordStore`] and
//! [`JsonLinesRecordStore`] (one NDJSON file per collection).

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::PersistenceResult;

/// Collections the dashboard writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collection {
    /// Uploaded tables: `{data, headers, user_id}`.
    DashboardData,
    /// Named configurations: `{name, config, user_id}`.
    DashboardConfigs,
    /// Saved filter views: `{name, filters, user_id}`.
    SavedViews,
}

impl Collection {
    /// Collection name as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DashboardData => "dashboard_data",
            Self::DashboardConfigs => "dashboard_configs",
            Self::SavedViews => "saved_views",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier assigned by a store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A record as returned by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Assigned per collection, starting at 1 and increasing with every insert.
    pub id: RecordId,
    /// Unix timestamp (seconds) of the insert. Records inserted within the same second share it;
    /// the id breaks the tie.
    pub created_at: u64,
    pub payload: serde_json::Value,
}

/// Append-only record store.
pub trait RecordStore: Send + Sync {
    /// Insert `payload` into `collection`, returning the stored record.
    fn insert(&self, collection: Collection, payload: serde_json::Value) -> PersistenceResult<StoredRecord>;

    /// All records of `collection`, newest first.
    fn select_newest_first(&self, collection: Collection) -> PersistenceResult<Vec<StoredRecord>>;
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn sort_newest_first(records: &mut [StoredRecord]) {
    records.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
}

/// Process-local store, mainly for tests and single-run tools.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<BTreeMap<Collection, Vec<StoredRecord>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in `collection`.
    pub fn len(&self, collection: Collection) -> usize {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.get(&collection).map_or(0, Vec::len)
    }
}

impl RecordStore for MemoryRecordStore {
    fn insert(&self, collection: Collection, payload: serde_json::Value) -> PersistenceResult<StoredRecord> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let stored = records.entry(collection).or_default();
        let record = StoredRecord {
            id: RecordId(stored.len() as u64 + 1),
            created_at: unix_ts(),
            payload,
        };
        stored.push(record.clone());
        Ok(record)
    }

    fn select_newest_first(&self, collection: Collection) -> PersistenceResult<Vec<StoredRecord>> {
        let stored = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = stored.get(&collection).cloned().unwrap_or_default();
        sort_newest_first(&mut records);
        Ok(records)
    }
}

/// File-backed store: `<dir>/<collection>.ndjson`, one [`StoredRecord`] per line.
///
/// The next id of a collection is one past its line count, counted once per collection and then
/// kept in memory. A line that fails to parse still occupies its id.
#[derive(Debug)]
pub struct JsonLinesRecordStore {
    dir: PathBuf,
    last_ids: Mutex<BTreeMap<Collection, u64>>,
}

impl JsonLinesRecordStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> PersistenceResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            last_ids: Mutex::new(BTreeMap::new()),
        })
    }

    fn count_lines(&self, collection: Collection) -> PersistenceResult<u64> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(0);
        }
        let text = fs::read_to_string(&path)?;
        Ok(text.lines().filter(|l| !l.trim().is_empty()).count() as u64)
    }

    fn collection_path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.ndjson", collection.as_str()))
    }

    fn read_all(&self, collection: Collection) -> PersistenceResult<Vec<StoredRecord>> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let text = fs::read_to_string(&path)?;
        let mut records = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            records.push(serde_json::from_str::<StoredRecord>(line)?);
        }
        Ok(records)
    }
}

impl RecordStore for JsonLinesRecordStore {
    fn insert(&self, collection: Collection, payload: serde_json::Value) -> PersistenceResult<StoredRecord> {
        let mut last_ids = self.last_ids.lock().unwrap_or_else(PoisonError::into_inner);
        let last = match last_ids.get(&collection) {
            Some(&id) => id,
            None => self.count_lines(collection)?,
        };
        let next_id = last + 1;

        let record = StoredRecord {
            id: RecordId(next_id),
            created_at: unix_ts(),
            payload,
        };
        let line = serde_json::to_string(&record)?;

        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.collection_path(collection))?;
        writeln!(f, "{line}")?;
        last_ids.insert(collection, next_id);
        Ok(record)
    }

    fn select_newest_first(&self, collection: Collection) -> PersistenceResult<Vec<StoredRecord>> {
        let _guard = self.last_ids.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.read_all(collection)?;
        sort_newest_first(&mut records);
        Ok(records)
    }
}
