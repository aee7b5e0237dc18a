//! Tile layout contract
//!
//! The layout engine arranges blocks in a resizable grid. It is handed a
//! [`TileLayoutContents`] bundle and calls back into it to render nodes and
//! to delete them. Bundle identity (`Arc::ptr_eq`) tells the engine whether
//! anything it depends on has changed.

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;

use tabtile_wos::{ObjectCell, Tab};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorPoint {
    pub x: f64,
    pub y: f64,
}

/// Host accessor for the current pointer position, if known.
pub type CursorPointFn = Arc<dyn Fn() -> Option<CursorPoint> + Send + Sync>;

/// A leaf in the layout tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeModel {
    pub node_id: String,
    pub block_id: String,
}

impl NodeModel {
    pub fn new(node_id: impl Into<String>, block_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            block_id: block_id.into(),
        }
    }
}

/// Props for the block view component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockView {
    /// Reconciliation key, always the block id
    pub key: String,
    pub block_id: String,
    /// Preview mode renders with reduced interactivity (drag ghosts, etc.)
    pub preview: bool,
}

impl BlockView {
    pub fn new(node: &NodeModel, preview: bool) -> Self {
        Self {
            key: node.block_id.clone(),
            block_id: node.block_id.clone(),
            preview,
        }
    }
}

pub type ContentRenderer = Arc<dyn Fn(&NodeModel) -> BlockView + Send + Sync>;
pub type PreviewRenderer = Arc<dyn Fn(&NodeModel) -> BlockView + Send + Sync>;

/// Starts a node deletion. The engine may drop the handle.
pub type NodeDeleteHandler = Arc<dyn Fn(&NodeModel) -> JoinHandle<()> + Send + Sync>;

pub struct TileLayoutContents {
    pub tab_id: String,
    pub gap_size_px: Option<f64>,
    pub render_content: ContentRenderer,
    pub render_preview: PreviewRenderer,
    pub on_node_delete: NodeDeleteHandler,
}

impl fmt::Debug for TileLayoutContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileLayoutContents")
            .field("tab_id", &self.tab_id)
            .field("gap_size_px", &self.gap_size_px)
            .finish_non_exhaustive()
    }
}

/// Everything the layout engine receives for one tab.
#[derive(Clone)]
pub struct LayoutProps {
    /// Remount key; a different key means a different tab.
    pub key: String,
    pub contents: Arc<TileLayoutContents>,
    pub tab: ObjectCell<Tab>,
    pub cursor_point: CursorPointFn,
}

impl fmt::Debug for LayoutProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutProps")
            .field("key", &self.key)
            .field("contents", &self.contents)
            .field("tab", &self.tab)
            .finish_non_exhaustive()
    }
}

/// The tile layout engine.
///
/// Calls `render_content`/`render_preview` once per visible node and
/// `on_node_delete` once per user-initiated removal.
pub trait TileLayout: Send + Sync {
    type View;

    fn render(&self, props: LayoutProps) -> Self::View;
}
