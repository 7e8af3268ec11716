// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Key/value persistence: one SQLite table of string values grouped by
// namespace.
//
// Schema:
//   kv(
//     namespace  TEXT NOT NULL,   -- e.g. "officeUserSettings"
//     key        TEXT NOT NULL,   -- e.g. a chat id
//     value      TEXT NOT NULL,   -- usually JSON
//     updated_at TEXT NOT NULL,   -- RFC 3339
//     PRIMARY KEY (namespace, key)
//   )

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use printbot_core::error::{PrintbotError, Result};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, instrument};

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS kv (
        namespace  TEXT NOT NULL,
        key        TEXT NOT NULL,
        value      TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        PRIMARY KEY (namespace, key)
    )
"#;

/// Convert a `rusqlite::Error` into a `PrintbotError::Database`.
fn db_err(e: rusqlite::Error) -> PrintbotError {
    PrintbotError::Database(e.to_string())
}

/// Named string values surviving process restarts.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>>;

    /// Insert or replace.
    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<()>;

    /// Remove a value.  Removing a missing key is not an error.
    fn remove(&self, namespace: &str, key: &str) -> Result<()>;
}

/// `KeyValueStore` backed by a SQLite database.
///
/// The connection sits behind a mutex so the store can be shared between
/// handler tasks; every statement is a single-row lookup or upsert.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` in WAL mode.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(db_err)?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(db_err)?;
        conn.execute_batch(CREATE_TABLE_SQL).map_err(db_err)?;

        debug!("key/value store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        conn.execute_batch(CREATE_TABLE_SQL).map_err(db_err)?;

        debug!("in-memory key/value store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of keys stored under `namespace`.
    pub fn count(&self, namespace: &str) -> Result<u64> {
        self.conn()?
            .query_row(
                "SELECT COUNT(*) FROM kv WHERE namespace = ?1",
                params![namespace],
                |row| row.get(0),
            )
            .map_err(db_err)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| PrintbotError::Database("store lock poisoned".into()))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        self.conn()?
            .query_row(
                "SELECT value FROM kv WHERE namespace = ?1 AND key = ?2",
                params![namespace, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)
    }

    #[instrument(skip(self, value), fields(%namespace, %key))]
    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn()?
            .execute(
                "INSERT INTO kv (namespace, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(namespace, key) DO UPDATE SET value = ?3, updated_at = ?4",
                params![namespace, key, value, now],
            )
            .map_err(db_err)?;
        debug!("value stored");
        Ok(())
    }

    #[instrument(skip(self), fields(%namespace, %key))]
    fn remove(&self, namespace: &str, key: &str) -> Result<()> {
        self.conn()?
            .execute(
                "DELETE FROM kv WHERE namespace = ?1 AND key = ?2",
                params![namespace, key],
            )
            .map_err(db_err)?;
        debug!("value removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> SqliteStore {
        SqliteStore::open_in_memory().expect("open in-memory store")
    }

    #[test]
    fn set_get_overwrite() {
        let store = make_store();
        assert_eq!(store.get("ns", "k").unwrap(), None);

        store.set("ns", "k", "one").unwrap();
        store.set("ns", "k", "two").unwrap();

        assert_eq!(store.get("ns", "k").unwrap().as_deref(), Some("two"));
        assert_eq!(store.count("ns").unwrap(), 1);
    }

    #[test]
    fn namespaces_are_separate() {
        let store = make_store();
        store.set("a", "k", "from a").unwrap();
        store.set("b", "k", "from b").unwrap();

        assert_eq!(store.get("a", "k").unwrap().as_deref(), Some("from a"));
        assert_eq!(store.get("b", "k").unwrap().as_deref(), Some("from b"));
    }

    #[test]
    fn remove_is_idempotent() {
        let store = make_store();
        store.set("ns", "k", "v").unwrap();
        store.remove("ns", "k").unwrap();
        store.remove("ns", "k").unwrap();
        assert_eq!(store.get("ns", "k").unwrap(), None);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("printbot.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("ns", "k", "persisted").unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get("ns", "k").unwrap().as_deref(), Some("persisted"));
    }
}
