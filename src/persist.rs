//! Task collection ↔ storage-slot persistence.
//!
//! The slot is a save file: read on sign-in/refresh, rewritten after
//! every mutation. Never consulted at runtime — the in-memory store is
//! the session's source of truth, so a failed save is a silent
//! durability loss, not a functional failure.

use crate::task::Task;
use redb::{Database, ReadableTable, TableDefinition};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Slot key for the persisted task collection.
pub const TASKS_SLOT: &str = "task_management_tasks";

const SLOTS: TableDefinition<&str, &str> = TableDefinition::new("slots");

// ── Errors ─────────────────────────────────────────────────────

/// Persistence failures. Nothing here ever reaches the end user: the
/// store logs and keeps running against memory.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage: {0}")]
    Backend(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("encode: {0}")]
    Encode(String),
}

// redb 2.x has many error types. Blanket them all into Backend.
macro_rules! from_redb {
    ($($t:ty),*) => {
        $(impl From<$t> for StorageError {
            fn from(e: $t) -> Self { StorageError::Backend(e.to_string()) }
        })*
    };
}

from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TableError,
    redb::TransactionError,
    redb::StorageError,
    redb::CommitError
);

// ── Storage substrate ──────────────────────────────────────────

/// A string-keyed slot store. The engine writes whole-collection blobs,
/// so implementations only need read/write/remove on single keys.
pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage> Storage for &mut S {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory substrate for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);
        Ok(())
    }
}

/// Local-file substrate: one redb database holding one string→string
/// table of slots. Cloneable (Arc inside).
#[derive(Clone)]
pub struct RedbStorage {
    db: Arc<Database>,
}

impl RedbStorage {
    /// Open (or create) the slot file at the given path.
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let db = Database::create(path)?;

        // Ensure the table exists
        let txn = db.begin_write()?;
        {
            let _ = txn.open_table(SLOTS)?;
        }
        txn.commit()?;

        Ok(RedbStorage { db: Arc::new(db) })
    }
}

impl Storage for RedbStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(SLOTS)?;
        Ok(table.get(key)?.map(|v| v.value().to_string()))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SLOTS)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SLOTS)?;
            table.remove(key)?;
        }
        txn.commit()?;
        Ok(())
    }
}

// ── Save slot ──────────────────────────────────────────────────

/// The persisted task collection: one slot holding a JSON array.
/// Dates travel as ISO-8601 strings; record fields the engine doesn't
/// model survive the round trip (see `Task::extra`).
pub struct SaveSlot<S: Storage> {
    storage: S,
}

impl<S: Storage> SaveSlot<S> {
    pub fn new(storage: S) -> Self {
        SaveSlot { storage }
    }

    /// Serialize the full collection into the slot: every task the
    /// caller knows about, not just one user's subset.
    /// The caller decides whether a failure matters (the store logs it).
    pub fn save(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(tasks).map_err(|e| StorageError::Encode(e.to_string()))?;
        self.storage.write(TASKS_SLOT, &json)
    }

    /// Read the collection back. An absent, malformed, or unreadable
    /// slot comes back as an empty collection — logged, never raised.
    pub fn load(&self) -> Vec<Task> {
        let raw = match self.storage.read(TASKS_SLOT) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("failed to read task slot: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                debug!(count = tasks.len(), "loaded task slot");
                tasks
            }
            Err(e) => {
                warn!("failed to parse task slot: {e}");
                Vec::new()
            }
        }
    }

    /// Remove the slot. Explicit reset flows only; normal task
    /// operations never call this.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove(TASKS_SLOT)
    }
}

// ── Tests ──────────────────────────────────────────────────────
