//! Content provider bundles for the tile layout

use parking_lot::Mutex;
use std::sync::Arc;

use tabtile_service::{fire_and_forget, ObjectService};

use crate::layout::{BlockView, NodeModel, TileLayoutContents};

/// Build the callbacks the layout engine needs for `tab_id`.
pub fn make_tile_layout_contents(
    tab_id: &str,
    gap_size_px: Option<f64>,
    service: Arc<dyn ObjectService>,
) -> TileLayoutContents {
    TileLayoutContents {
        tab_id: tab_id.to_string(),
        gap_size_px,
        render_content: Arc::new(|node: &NodeModel| BlockView::new(node, false)),
        render_preview: Arc::new(|node: &NodeModel| BlockView::new(node, true)),
        on_node_delete: Arc::new(move |node: &NodeModel| {
            let service = Arc::clone(&service);
            let block_id = node.block_id.clone();
            tracing::debug!(block_id = %block_id, "Deleting block from layout");
            fire_and_forget("delete block", async move {
                service.delete_block(&block_id).await
            })
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ProviderKey {
    tab_id: String,
    gap_size_px: Option<f64>,
}

/// Single-slot memo of the last bundle, keyed by `(tab_id, gap_size_px)`.
pub struct ProviderCache {
    service: Arc<dyn ObjectService>,
    current: Mutex<Option<(ProviderKey, Arc<TileLayoutContents>)>>,
}

impl ProviderCache {
    pub fn new(service: Arc<dyn ObjectService>) -> Self {
        Self {
            service,
            current: Mutex::new(None),
        }
    }

    /// The bundle for these inputs. Same inputs, same `Arc`.
    pub fn get(&self, tab_id: &str, gap_size_px: Option<f64>) -> Arc<TileLayoutContents> {
        let mut current = self.current.lock();

        if let Some((key, contents)) = current.as_ref() {
            if key.tab_id == tab_id && key.gap_size_px == gap_size_px {
                return Arc::clone(contents);
            }
        }

        tracing::debug!(tab_id = %tab_id, gap_size_px = ?gap_size_px, "Rebuilding layout contents");

        let contents = Arc::new(make_tile_layout_contents(
            tab_id,
            gap_size_px,
            Arc::clone(&self.service),
        ));
        *current = Some((
            ProviderKey {
                tab_id: tab_id.to_string(),
                gap_size_px,
            },
            Arc::clone(&contents),
        ));
        contents
    }
}
