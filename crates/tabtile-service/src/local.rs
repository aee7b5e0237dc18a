//! In-process object service
//!
//! Applies mutations straight to an [`ObjectStore`]. Hosts that talk to a
//! backend implement [`ObjectService`] themselves and feed the store from
//! their own update stream.

use async_trait::async_trait;
use uuid::Uuid;

use tabtile_wos::{make_oref, Block, BlockDef, ORef, ObjectStore, Tab, WaveObject};

use crate::error::ServiceError;
use crate::service::ObjectService;
use crate::Result;

#[derive(Clone)]
pub struct LocalObjectService {
    store: ObjectStore,
}

impl LocalObjectService {
    pub fn new(store: ObjectStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Create an empty tab
    pub fn create_tab(&self, name: &str) -> Tab {
        let tab = Tab::new(Uuid::new_v4().to_string(), name);
        self.store.put(tab.clone());

        tracing::info!(tab_id = %tab.oid, name = %tab.name, "Created new tab");

        tab
    }

    /// Close a tab together with its blocks. Returns false if it did not exist.
    pub fn close_tab(&self, tab_id: &str) -> bool {
        let tab_oref = make_oref(Tab::OTYPE, tab_id);
        let Some(tab) = self.store.get::<Tab>(&tab_oref) else {
            return false;
        };

        for block_id in &tab.blockids {
            self.store.delete(&make_oref(Block::OTYPE, block_id));
        }
        self.store.delete(&tab_oref);

        tracing::info!(tab_id = %tab_id, blocks = tab.blockids.len(), "Closed tab");

        true
    }
}

#[async_trait]
impl ObjectService for LocalObjectService {
    async fn create_block(&self, tab_id: &str, def: BlockDef) -> Result<String> {
        let tab_oref = make_oref(Tab::OTYPE, tab_id);
        if self.store.get::<Tab>(&tab_oref).is_none() {
            return Err(ServiceError::TabNotFound(tab_id.to_string()));
        }

        let block = Block {
            oid: Uuid::new_v4().to_string(),
            parentoref: tab_oref.to_string(),
            meta: def.meta,
        };
        let block_id = block.oid.clone();
        let block_oref = block.oref();
        let view = block.view().unwrap_or_default().to_string();

        self.store.put(block);
        let attached = self
            .store
            .update::<Tab>(&tab_oref, |tab| tab.blockids.push(block_id.clone()));

        if !attached {
            // Tab closed while we were creating; don't leave an orphan behind.
            self.store.delete(&block_oref);
            return Err(ServiceError::TabNotFound(tab_id.to_string()));
        }

        tracing::info!(tab_id = %tab_id, block_id = %block_id, view = %view, "Created block");

        Ok(block_id)
    }

    async fn delete_block(&self, block_id: &str) -> Result<()> {
        let block_oref = make_oref(Block::OTYPE, block_id);
        let Some(block) = self.store.get::<Block>(&block_oref) else {
            tracing::debug!(block_id = %block_id, "Block already deleted");
            return Ok(());
        };

        let parent: ORef = block
            .parentoref
            .parse()
            .map_err(|_| ServiceError::InvalidParent {
                block_id: block_id.to_string(),
                parent: block.parentoref.clone(),
            })?;

        self.store
            .update::<Tab>(&parent, |tab| tab.blockids.retain(|id| id != block_id));
        self.store.delete(&block_oref);

        tracing::info!(tab_id = %parent.oid, block_id = %block_id, "Deleted block");

        Ok(())
    }
}
