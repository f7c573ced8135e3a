//! Database connection management

use crate::error::{Error, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Duration;

use super::{migrations, KeyValueStore};

/// `SQLite`-backed persistent key-value storage
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let database = Self {
            conn: Connection::open(path)?,
        };
        database.configure();
        database.migrate()?;
        tracing::debug!("Opened quote database at {}", path.display());
        Ok(database)
    }

    /// Open an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let database = Self {
            conn: Connection::open_in_memory()?,
        };
        database.configure();
        database.migrate()?;
        Ok(database)
    }

    fn configure(&self) {
        // journal_mode reports the resulting mode as a row
        self.conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get::<_, String>(0))
            .ok();
        self.conn.pragma_update(None, "synchronous", "NORMAL").ok();
        // other CLI processes may hold the write lock briefly
        self.conn.busy_timeout(Duration::from_secs(5)).ok();
    }

    fn migrate(&self) -> Result<()> {
        migrations::run(&self.conn)
    }

    /// Get a reference to the underlying connection
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?", params![key], |row| {
                row.get(0)
            })
            .optional()?)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?, ?)",
                params![key, value],
            )
            .map_err(|error| Error::Storage(format!("failed to write '{key}': {error}")))?;
        Ok(())
    }
}
