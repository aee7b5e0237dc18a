//! Empty tab presentation for minimal mode

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;

use tabtile_service::{fire_and_forget, ObjectService};
use tabtile_wos::BlockDef;

pub const EMPTY_STATE_MESSAGE: &str = "Open a block to get started";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub label: &'static str,
    pub icon: &'static str,
    /// Block view created by this action
    pub view: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 4] = [
    QuickAction {
        label: "Terminal",
        icon: "terminal",
        view: "term",
    },
    QuickAction {
        label: "Web",
        icon: "globe",
        view: "web",
    },
    QuickAction {
        label: "Files",
        icon: "file",
        view: "preview",
    },
    QuickAction {
        label: "AI Chat",
        icon: "sparkles",
        view: "waveai",
    },
];

/// Quick-create menu shown for a tab with no blocks.
#[derive(Clone)]
pub struct MinimalEmptyState {
    tab_id: String,
    service: Arc<dyn ObjectService>,
}

impl fmt::Debug for MinimalEmptyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinimalEmptyState")
            .field("tab_id", &self.tab_id)
            .finish_non_exhaustive()
    }
}

impl MinimalEmptyState {
    pub fn new(tab_id: impl Into<String>, service: Arc<dyn ObjectService>) -> Self {
        Self {
            tab_id: tab_id.into(),
            service,
        }
    }

    pub fn tab_id(&self) -> &str {
        &self.tab_id
    }

    pub fn message(&self) -> &'static str {
        EMPTY_STATE_MESSAGE
    }

    pub fn actions(&self) -> &'static [QuickAction] {
        &QUICK_ACTIONS
    }

    /// Request a new block for `action`.
    ///
    /// Returns immediately; the tab leaves the empty state once the store
    /// reflects the new block.
    pub fn activate(&self, action: &QuickAction) -> JoinHandle<()> {
        let service = Arc::clone(&self.service);
        let tab_id = self.tab_id.clone();
        let def = BlockDef::with_view(action.view);

        tracing::debug!(tab_id = %tab_id, view = action.view, "Quick action activated");

        fire_and_forget("create block", async move {
            service.create_block(&tab_id, def).await
        })
    }

    /// Activate the action for `view`, if there is one.
    pub fn activate_view(&self, view: &str) -> Option<JoinHandle<()>> {
        let action = QUICK_ACTIONS.iter().find(|a| a.view == view)?;
        Some(self.activate(action))
    }
}
