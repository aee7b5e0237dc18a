//! Tabtile Core
//!
//! Binds a tab's persisted state to the tile layout engine: decides whether
//! the content area shows a placeholder, an empty-state menu, or the layout,
//! and supplies the layout with its render and delete callbacks.

mod config;
mod empty_state;
mod error;
mod gap;
mod layout;
mod provider;
mod tab_content;
mod workbench;

pub use config::{Config, Padding, PaddingConfig};
pub use empty_state::{MinimalEmptyState, QuickAction, EMPTY_STATE_MESSAGE, QUICK_ACTIONS};
pub use error::CoreError;
pub use gap::{effective_gap_size, MINIMAL_MODE_GAP_SIZE};
pub use layout::{
    BlockView, ContentRenderer, CursorPoint, CursorPointFn, LayoutProps, NodeDeleteHandler,
    NodeModel, PreviewRenderer, TileLayout, TileLayoutContents,
};
pub use provider::{make_tile_layout_contents, ProviderCache};
pub use tab_content::{
    ContentBranch, TabContent, TabContentEnv, TabContentFrame, TabContentView, TAB_LOADING_TEXT,
    TAB_NOT_FOUND_TEXT,
};
pub use workbench::Workbench;

// Re-export the layers underneath
pub use tabtile_service::{fire_and_forget, LocalObjectService, ObjectService, ServiceError};
pub use tabtile_storage::{Database, StorageError};
pub use tabtile_wos::{
    make_oref, settings, Block, BlockDef, Cell, ORef, ObjectCell, ObjectStore, SettingsSnapshot,
    SettingsStore, Tab, WaveObject, WosError,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging with the default `info` filter
pub fn init_logging() {
    init_logging_with("info");
}

/// Initialize logging with the filter named in `config`
pub fn init_logging_from(config: &Config) {
    init_logging_with(&config.log_filter);
}

/// Initialize logging. `RUST_LOG` takes precedence over `default_filter`.
pub fn init_logging_with(default_filter: &str) {
    use tracing_subscriber::fmt;

    let filter = log_filter(std::env::var("RUST_LOG").ok().as_deref(), default_filter);
    fmt().with_env_filter(filter).with_target(true).init();
}

/// An unset, empty, or unparsable `from_env` falls back to `default_filter`.
fn log_filter(from_env: Option<&str>, default_filter: &str) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    from_env
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter))
}
