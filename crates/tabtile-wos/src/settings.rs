//! Reactive settings
//!
//! Settings are a flat `key -> JSON` map. The whole map is exposed as one
//! cell for derived values that read several keys, and individual keys can be
//! watched on their own. When a database is attached, writes persist before
//! they are published.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tabtile_storage::Database;

use crate::cell::Cell;
use crate::Result;

/// Reduced-UI display mode.
pub const MINIMAL_MODE_KEY: &str = "window:minimalmode";
/// Gap between tiles, in pixels.
pub const TILE_GAP_SIZE_KEY: &str = "window:tilegapsize";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsSnapshot {
    values: BTreeMap<String, Value>,
}

impl SettingsSnapshot {
    pub fn from_map(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `window:minimalmode`, false unless set to `true`.
    pub fn minimal_mode(&self) -> bool {
        self.get(MINIMAL_MODE_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// `window:tilegapsize` exactly as configured.
    ///
    /// Only an absent or JSON `null` value is unset. A value that is not a
    /// number at all also reads as unset.
    pub fn tile_gap_size(&self) -> Option<f64> {
        self.get(TILE_GAP_SIZE_KEY).and_then(Value::as_f64)
    }
}

#[derive(Clone)]
pub struct SettingsStore {
    snapshot: Cell<SettingsSnapshot>,
    keys: Arc<RwLock<HashMap<String, Cell<Option<Value>>>>>,
    db: Option<Database>,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore {
    /// In-memory store with no persistence.
    pub fn new() -> Self {
        Self::with_values(BTreeMap::new(), None)
    }

    /// Load persisted settings and write future changes through to `db`.
    pub fn load(db: Database) -> Result<Self> {
        let values = db.load_settings()?;
        tracing::info!(count = values.len(), "Loaded settings");
        Ok(Self::with_values(values, Some(db)))
    }

    fn with_values(values: BTreeMap<String, Value>, db: Option<Database>) -> Self {
        Self {
            snapshot: Cell::new(SettingsSnapshot::from_map(values)),
            keys: Arc::new(RwLock::new(HashMap::new())),
            db,
        }
    }

    pub fn snapshot_cell(&self) -> Cell<SettingsSnapshot> {
        self.snapshot.clone()
    }

    pub fn snapshot(&self) -> SettingsSnapshot {
        self.snapshot.get()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.snapshot.with(|s| s.get(key).cloned())
    }

    /// Cell tracking a single key.
    pub fn key_cell(&self, key: &str) -> Cell<Option<Value>> {
        if let Some(cell) = self.keys.read().get(key) {
            return cell.clone();
        }

        let mut keys = self.keys.write();
        keys.entry(key.to_string())
            .or_insert_with(|| Cell::new(self.get(key)))
            .clone()
    }

    /// Set `key`. A JSON `null` removes it.
    pub fn set(&self, key: &str, value: Value) -> Result<()> {
        if value.is_null() {
            return self.remove(key);
        }

        if let Some(db) = &self.db {
            db.set_setting(key, &value)?;
        }

        tracing::debug!(key = %key, value = %value, "Setting changed");
        self.publish(key, Some(value));
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        if let Some(db) = &self.db {
            db.remove_setting(key)?;
        }

        tracing::debug!(key = %key, "Setting removed");
        self.publish(key, None);
        Ok(())
    }

    fn publish(&self, key: &str, value: Option<Value>) {
        self.snapshot.update(|s| match &value {
            Some(v) => {
                s.values.insert(key.to_string(), v.clone());
            }
            None => {
                s.values.remove(key);
            }
        });

        if let Some(cell) = self.keys.read().get(key) {
            cell.set(value);
        }
    }
}
