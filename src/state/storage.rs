use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::StoreError;

/// A local key-value store seen from one execution context.
///
/// Writes made through this handle are never reported back to it as
/// external changes; writes made by any other context on the same
/// underlying store are.
pub trait Storage {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`. Writing the value already stored is a no-op
    /// and is not announced to other contexts.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// True if another context changed the store since the last call
    fn take_external_change(&mut self) -> Result<bool, StoreError>;
}

#[derive(Debug, Default)]
struct Shared {
    values: BTreeMap<String, String>,
    /// One flag per context, set when someone else writes
    pending: Vec<bool>,
}

/// In-process store shared by several contexts, like one browser profile
/// shared by several tabs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    shared: Rc<RefCell<Shared>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new execution context on this store
    pub fn context(&self) -> MemoryContext {
        let mut shared = self.shared.borrow_mut();
        shared.pending.push(false);
        MemoryContext {
            id: shared.pending.len() - 1,
            shared: Rc::clone(&self.shared),
        }
    }
}

/// One execution context of a [`MemoryStorage`]
#[derive(Debug)]
pub struct MemoryContext {
    id: usize,
    shared: Rc<RefCell<Shared>>,
}

impl Storage for MemoryContext {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.shared.borrow().values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut shared = self.shared.borrow_mut();
        if shared.values.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        shared.values.insert(key.to_string(), value.to_string());
        for (id, pending) in shared.pending.iter_mut().enumerate() {
            if id != self.id {
                *pending = true;
            }
        }
        Ok(())
    }

    fn take_external_change(&mut self) -> Result<bool, StoreError> {
        let mut shared = self.shared.borrow_mut();
        Ok(std::mem::take(&mut shared.pending[self.id]))
    }
}

/// On-disk store backed by SQLite.
///
/// Every open connection is its own execution context. Foreign commits are
/// detected through `PRAGMA data_version`, which only changes when another
/// connection commits to the same database file.
pub struct SqliteStorage {
    conn: Connection,
    db_path: PathBuf,
    data_version: i64,
}

impl SqliteStorage {
    /// Open (or create) the store at `db_path`
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref().to_path_buf();

        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;
        Self::init_schema(&conn)?;
        let data_version = Self::read_data_version(&conn)?;

        tracing::info!(path = %db_path.display(), "preference store opened");

        Ok(Self {
            conn,
            db_path,
            data_version,
        })
    }

    /// Private in-memory store, used when the database file cannot be opened
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        let data_version = Self::read_data_version(&conn)?;
        Ok(Self {
            conn,
            db_path: PathBuf::from(":memory:"),
            data_version,
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL,
                updated_at      INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn read_data_version(conn: &Connection) -> Result<i64, StoreError> {
        Ok(conn.query_row("PRAGMA data_version", [], |row| row.get(0))?)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }
}

impl Storage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.get(key)?.as_deref() == Some(value) {
            return Ok(());
        }
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, Utc::now().timestamp()],
        )?;
        tracing::debug!(key, "stored value");
        Ok(())
    }

    fn take_external_change(&mut self) -> Result<bool, StoreError> {
        let version = Self::read_data_version(&self.conn)?;
        let changed = version != self.data_version;
        self.data_version = version;
        Ok(changed)
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for SqliteStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStorage")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_write_visible_to_other_context() {
        let store = MemoryStorage::new();
        let mut a = store.context();
        let mut b = store.context();

        a.set("k", "v").unwrap();

        assert_eq!(b.get("k").unwrap().as_deref(), Some("v"));
        assert!(b.take_external_change().unwrap());
        assert!(!b.take_external_change().unwrap());
        assert!(!a.take_external_change().unwrap());
    }

    #[test]
    fn test_memory_unchanged_write_is_silent() {
        let store = MemoryStorage::new();
        let mut a = store.context();
        let mut b = store.context();

        a.set("k", "v").unwrap();
        assert!(b.take_external_change().unwrap());

        a.set("k", "v").unwrap();
        assert!(!b.take_external_change().unwrap());
    }

    #[test]
    fn test_sqlite_roundtrip_and_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SqliteStorage::open(dir.path().join("nested").join("prefs.db")).unwrap();

        assert_eq!(store.get("theme").unwrap(), None);
        store.set("theme", "dark").unwrap();
        store.set("theme", "light").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_sqlite_in_memory_has_no_foreign_writers() {
        let mut store = SqliteStorage::in_memory().unwrap();
        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert!(!store.take_external_change().unwrap());
    }

    #[test]
    fn test_sqlite_foreign_commit_detected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.db");
        let mut a = SqliteStorage::open(&path).unwrap();
        let mut b = SqliteStorage::open(&path).unwrap();

        a.set("favorites", "[\"Pasta\"]").unwrap();

        assert!(b.take_external_change().unwrap());
        assert!(!b.take_external_change().unwrap());
        assert!(!a.take_external_change().unwrap());
        assert_eq!(b.get("favorites").unwrap().as_deref(), Some("[\"Pasta\"]"));
    }
}
