//! Workbench state container
//!
//! Owns the stores and the object service for one window and hands out
//! tab content orchestrators wired to them.

use serde_json::Value;
use std::sync::Arc;

use tabtile_service::LocalObjectService;
use tabtile_storage::Database;
use tabtile_wos::{ObjectStore, SettingsStore, Tab};

use crate::config::Config;
use crate::layout::{CursorPointFn, TileLayout};
use crate::tab_content::{TabContent, TabContentEnv};
use crate::Result;

pub struct Workbench {
    config: Config,
    store: ObjectStore,
    settings: SettingsStore,
    service: LocalObjectService,
}

impl Workbench {
    /// Open the settings database named in `config` and load settings.
    pub fn new(config: Config) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        let workbench = Self::with_database(config, db)?;

        tracing::info!(
            database = %workbench.config.database_path.display(),
            "Workbench initialized"
        );

        Ok(workbench)
    }

    /// Workbench backed by an in-memory settings database.
    pub fn in_memory(config: Config) -> Result<Self> {
        Self::with_database(config, Database::open_in_memory()?)
    }

    fn with_database(config: Config, db: Database) -> Result<Self> {
        let store = ObjectStore::new();
        Ok(Self {
            config,
            settings: SettingsStore::load(db)?,
            service: LocalObjectService::new(store.clone()),
            store,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn service(&self) -> &LocalObjectService {
        &self.service
    }

    pub fn set_setting(&self, key: &str, value: Value) -> Result<()> {
        Ok(self.settings.set(key, value)?)
    }

    pub fn create_tab(&self, name: &str) -> Tab {
        self.service.create_tab(name)
    }

    pub fn env(&self, cursor_point: CursorPointFn) -> TabContentEnv {
        TabContentEnv {
            store: self.store.clone(),
            settings: self.settings.clone(),
            service: Arc::new(self.service.clone()),
            cursor_point,
            padding: self.config.padding,
            minimal_gap_size: self.config.minimal_gap_size,
        }
    }

    pub fn tab_content<L: TileLayout>(
        &self,
        tab_id: &str,
        layout: L,
        cursor_point: CursorPointFn,
    ) -> Result<TabContent<L>> {
        TabContent::new(tab_id, self.env(cursor_point), layout)
    }
}
