//! Database connection and settings persistence

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::StorageError;
use crate::migrations::run_migrations;
use crate::Result;

/// Shared handle to the settings database. Clones share one connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;

        let _: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        run_migrations(&conn)?;

        tracing::debug!(path = %path.as_ref().display(), "Opened settings database");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    /// Read one setting. Missing keys yield `None`.
    pub fn get_setting(&self, key: &str) -> Result<Option<Value>> {
        let raw: Option<String> = self.with_connection(|conn| {
            Ok(conn
                .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                    row.get(0)
                })
                .optional()?)
        })?;

        raw.map(|text| decode(key, &text)).transpose()
    }

    pub fn set_setting(&self, key: &str, value: &Value) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        let updated_at = Utc::now().to_rfc3339();

        self.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key, encoded, updated_at],
            )?;
            Ok(())
        })
    }

    /// Delete a setting. Returns whether a row was removed.
    pub fn remove_setting(&self, key: &str) -> Result<bool> {
        self.with_connection(|conn| {
            let removed = conn.execute("DELETE FROM settings WHERE key = ?1", [key])?;
            Ok(removed > 0)
        })
    }

    /// Load every stored setting.
    ///
    /// Rows that no longer parse as JSON are skipped with a warning instead of
    /// failing the whole load, so one corrupt value cannot lock a user out.
    pub fn load_settings(&self) -> Result<BTreeMap<String, Value>> {
        let rows: Vec<(String, String)> = self.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT key, value FROM settings")?;
            let mut rows = Vec::new();
            for row in stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))? {
                match row {
                    Ok(pair) => rows.push(pair),
                    Err(
                        e @ (rusqlite::Error::InvalidColumnType(..)
                        | rusqlite::Error::FromSqlConversionFailure(..)),
                    ) => {
                        tracing::warn!(error = %e, "Skipping settings row with non-text columns");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Ok(rows)
        })?;

        let mut settings = BTreeMap::new();
        for (key, text) in rows {
            match decode(&key, &text) {
                Ok(value) => {
                    settings.insert(key, value);
                }
                Err(e) => tracing::warn!(key = %key, error = %e, "Skipping unreadable setting"),
            }
        }

        Ok(settings)
    }
}

fn decode(key: &str, text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|source| StorageError::InvalidValue {
        key: key.to_string(),
        source,
    })
}
