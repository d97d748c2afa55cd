// 💾 Persistence Adapter - load/save/clear full snapshots of the store
//
// The store never reaches for ambient storage; it is handed an adapter.
// Every save is a full rewrite, never incremental.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::entities::{BudgetItem, Categories, Guest, Table, Task, Vendor};
use crate::error::StorageError;

// ============================================================================
// SNAPSHOT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub total_budget: f64,
}

/// Point-in-time copy of every collection, keyed by entity-type name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub guests: Vec<Guest>,
    #[serde(default)]
    pub budget_items: Vec<BudgetItem>,
    #[serde(default)]
    pub vendors: Vec<Vendor>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub categories: Categories,
    #[serde(default)]
    pub settings: Settings,
}

impl Snapshot {
    /// Split into one JSON value per entity-type key
    pub fn to_entries(&self) -> Result<Vec<(String, serde_json::Value)>, StorageError> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(StorageError::Unavailable(format!(
                "snapshot serialized to non-object: {}",
                other
            ))),
        }
    }

    /// Reassemble from per-key values. Missing keys fall back to empty.
    pub fn from_entries<I>(entries: I) -> Result<Self, StorageError>
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        let map: serde_json::Map<String, serde_json::Value> = entries.into_iter().collect();
        Ok(serde_json::from_value(serde_json::Value::Object(map))?)
    }

    pub fn record_count(&self) -> usize {
        self.guests.len()
            + self.budget_items.len()
            + self.vendors.len()
            + self.tasks.len()
            + self.tables.len()
    }
}

// ============================================================================
// ADAPTER CONTRACT
// ============================================================================

pub trait PersistenceAdapter {
    /// Ok(None) when nothing has been saved yet
    fn load(&self) -> Result<Option<Snapshot>, StorageError>;

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError>;

    fn clear(&self) -> Result<(), StorageError>;

    /// Short label for log lines
    fn describe(&self) -> String;
}

// ============================================================================
// JSON FILE ADAPTER
// ============================================================================

/// One JSON document on disk
pub struct JsonFileAdapter {
    path: PathBuf,
}

impl JsonFileAdapter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonFileAdapter {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceAdapter for JsonFileAdapter {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(snapshot)?;

        // Write beside the target then rename, so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}

// ============================================================================
// MEMORY ADAPTER
// ============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    snapshot: Option<Snapshot>,
    saves: usize,
    fail_saves: bool,
}

/// In-process adapter. Clones share state, so a test can keep a handle
/// after giving one to the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryAdapter {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let adapter = Self::default();
        adapter.state.borrow_mut().snapshot = Some(snapshot);
        adapter
    }

    /// Make subsequent saves fail (simulates a full or unavailable disk)
    pub fn set_fail_saves(&self, fail: bool) {
        self.state.borrow_mut().fail_saves = fail;
    }

    pub fn save_count(&self) -> usize {
        self.state.borrow().saves
    }

    pub fn stored(&self) -> Option<Snapshot> {
        self.state.borrow().snapshot.clone()
    }
}

impl PersistenceAdapter for MemoryAdapter {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        Ok(self.state.borrow().snapshot.clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let mut state = self.state.borrow_mut();
        if state.fail_saves {
            return Err(StorageError::Unavailable("memory adapter set to fail".to_string()));
        }
        state.snapshot = Some(snapshot.clone());
        state.saves += 1;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.state.borrow_mut().snapshot = None;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

// ============================================================================
// TESTS
// ============================================================================
