//! Object service contract

use async_trait::async_trait;

use tabtile_wos::BlockDef;

use crate::Result;

/// Mutations on tabs and blocks.
///
/// Callers in the UI layer do not retry failed requests. Implementations must
/// treat deleting an already-deleted block as success.
#[async_trait]
pub trait ObjectService: Send + Sync {
    /// Create a block in `tab_id` and append it to the tab's block list.
    /// Returns the new block id.
    async fn create_block(&self, tab_id: &str, def: BlockDef) -> Result<String>;

    /// Delete a block and drop it from its tab's block list.
    async fn delete_block(&self, block_id: &str) -> Result<()>;
}
