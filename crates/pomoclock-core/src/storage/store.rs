//! SQLite-backed key/value store.
//!
//! Every persisted value is text; callers parse on the way out and treat
//! anything unparseable as absent. Writes are immediate and synchronous,
//! one per mutation.

use std::path::Path;

use rusqlite::{params, Connection};

use super::data_dir;
use crate::error::{CoreError, StoreError};

/// Flat string-keyed store.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the store at `~/.config/pomoclock/pomoclock.db`.
    ///
    /// Creates the file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the store cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("pomoclock.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open the store at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the store cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value, `None` if the key was never written.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        match stmt.query_row(params![key], |row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value, overwriting any previous one.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_missing_key_is_none() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn set_then_get() {
        let store = Store::open_in_memory().unwrap();
        store.set("timeLeft", "1500").unwrap();
        assert_eq!(store.get("timeLeft").unwrap().unwrap(), "1500");
    }

    #[test]
    fn set_overwrites() {
        let store = Store::open_in_memory().unwrap();
        store.set("cycles", "1").unwrap();
        store.set("cycles", "2").unwrap();
        assert_eq!(store.get("cycles").unwrap().unwrap(), "2");
    }

    #[test]
    fn open_at_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pomoclock.db");
        {
            let store = Store::open_at(&path).unwrap();
            store.set("date", "2024-06-01").unwrap();
        }
        let store = Store::open_at(&path).unwrap();
        assert_eq!(store.get("date").unwrap().unwrap(), "2024-06-01");
    }
}
