//! Tab content orchestration
//!
//! Maps a tab id to what the content area shows:
//!
//! ```text
//! loading?            -> "Tab Loading"
//! no tab object?      -> "Tab Not Found"
//! no blocks?          -> quick actions (minimal mode) or nothing
//! otherwise           -> tile layout
//! ```
//!
//! Every input is a cell, so a render is a set of snapshot reads. Hosts call
//! [`TabContent::changed`] (or drive [`TabContent::run`]) to learn when to
//! render again.

use parking_lot::Mutex;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;

use tokio::sync::watch;

use tabtile_service::ObjectService;
use tabtile_wos::{
    make_oref, Cell, ORef, ObjectCell, ObjectStore, SettingsSnapshot, SettingsStore, Tab, WaveObj,
    WaveObject,
};

use crate::config::{Padding, PaddingConfig};
use crate::empty_state::MinimalEmptyState;
use crate::error::CoreError;
use crate::gap::effective_gap_size;
use crate::layout::{CursorPointFn, LayoutProps, TileLayout, TileLayoutContents};
use crate::provider::ProviderCache;
use crate::Result;

pub const TAB_LOADING_TEXT: &str = "Tab Loading";
pub const TAB_NOT_FOUND_TEXT: &str = "Tab Not Found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentBranch {
    Loading,
    NotFound,
    Blank,
    EmptyState,
    Layout,
}

impl ContentBranch {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentBranch::Loading => "loading",
            ContentBranch::NotFound => "not-found",
            ContentBranch::Blank => "blank",
            ContentBranch::EmptyState => "empty-state",
            ContentBranch::Layout => "layout",
        }
    }
}

impl fmt::Display for ContentBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug)]
pub enum TabContentView<V> {
    Loading,
    NotFound,
    /// Tab exists but has no blocks and minimal mode is off
    Blank,
    EmptyState(MinimalEmptyState),
    Layout(V),
}

impl<V> TabContentView<V> {
    pub fn branch(&self) -> ContentBranch {
        match self {
            TabContentView::Loading => ContentBranch::Loading,
            TabContentView::NotFound => ContentBranch::NotFound,
            TabContentView::Blank => ContentBranch::Blank,
            TabContentView::EmptyState(_) => ContentBranch::EmptyState,
            TabContentView::Layout(_) => ContentBranch::Layout,
        }
    }

    /// Centered placeholder text, for the two placeholder branches.
    pub fn placeholder_text(&self) -> Option<&'static str> {
        match self {
            TabContentView::Loading => Some(TAB_LOADING_TEXT),
            TabContentView::NotFound => Some(TAB_NOT_FOUND_TEXT),
            _ => None,
        }
    }
}

/// One render of the content container.
#[derive(Debug)]
pub struct TabContentFrame<V> {
    pub padding: Padding,
    pub inner: TabContentView<V>,
}

/// Collaborators shared by every tab content instance.
#[derive(Clone)]
pub struct TabContentEnv {
    pub store: ObjectStore,
    pub settings: SettingsStore,
    pub service: Arc<dyn ObjectService>,
    pub cursor_point: CursorPointFn,
    pub padding: PaddingConfig,
    /// Gap used in minimal mode when no gap is configured.
    pub minimal_gap_size: f64,
}

struct TabBinding {
    tab_id: String,
    oref: ORef,
    loading: Cell<bool>,
    tab: ObjectCell<Tab>,
}

impl TabBinding {
    fn resolve(store: &ObjectStore, tab_id: &str) -> Result<Self> {
        if tab_id.is_empty() {
            return Err(CoreError::EmptyTabId);
        }

        let oref = make_oref(Tab::OTYPE, tab_id);
        Ok(Self {
            tab_id: tab_id.to_string(),
            loading: store.loading_cell(&oref),
            tab: store.object_cell::<Tab>(&oref)?,
            oref,
        })
    }
}

struct Watchers {
    loading: watch::Receiver<bool>,
    tab: watch::Receiver<Option<WaveObj>>,
    settings: watch::Receiver<SettingsSnapshot>,
}

impl Watchers {
    fn new(binding: &TabBinding, settings: &Cell<SettingsSnapshot>) -> Self {
        Self {
            loading: binding.loading.subscribe(),
            tab: binding.tab.subscribe(),
            settings: settings.subscribe(),
        }
    }
}

pub struct TabContent<L: TileLayout> {
    binding: TabBinding,
    watchers: Watchers,
    store: ObjectStore,
    settings: Cell<SettingsSnapshot>,
    service: Arc<dyn ObjectService>,
    cursor_point: CursorPointFn,
    padding: PaddingConfig,
    minimal_gap_size: f64,
    layout: L,
    providers: ProviderCache,
    last_branch: Mutex<Option<ContentBranch>>,
}

impl<L: TileLayout> TabContent<L> {
    pub fn new(tab_id: &str, env: TabContentEnv, layout: L) -> Result<Self> {
        let binding = TabBinding::resolve(&env.store, tab_id)?;
        let settings = env.settings.snapshot_cell();
        let watchers = Watchers::new(&binding, &settings);

        tracing::debug!(tab_id = %tab_id, "Bound tab content");

        Ok(Self {
            binding,
            watchers,
            store: env.store,
            settings,
            providers: ProviderCache::new(Arc::clone(&env.service)),
            service: env.service,
            cursor_point: env.cursor_point,
            padding: env.padding,
            minimal_gap_size: env.minimal_gap_size,
            layout,
            last_branch: Mutex::new(None),
        })
    }

    pub fn tab_id(&self) -> &str {
        &self.binding.tab_id
    }

    pub fn oref(&self) -> &ORef {
        &self.binding.oref
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Rebind to another tab. The previous tab's cells are dropped.
    pub fn set_tab_id(&mut self, tab_id: &str) -> Result<()> {
        if tab_id == self.binding.tab_id {
            return Ok(());
        }

        let binding = TabBinding::resolve(&self.store, tab_id)?;
        tracing::debug!(from = %self.binding.tab_id, to = %tab_id, "Rebinding tab content");

        self.watchers = Watchers::new(&binding, &self.settings);
        self.binding = binding;
        *self.last_branch.lock() = None;
        Ok(())
    }

    /// Current layout bundle for this tab and the current settings.
    pub fn contents(&self) -> Arc<TileLayoutContents> {
        let snapshot = self.settings.get();
        let gap = effective_gap_size(
            snapshot.minimal_mode(),
            snapshot.tile_gap_size(),
            self.minimal_gap_size,
        );
        self.providers.get(&self.binding.tab_id, gap)
    }

    pub fn render(&self) -> TabContentFrame<L::View> {
        let snapshot = self.settings.get();
        let minimal_mode = snapshot.minimal_mode();

        let inner = if self.binding.loading.get() {
            TabContentView::Loading
        } else {
            match self.binding.tab.get() {
                None => TabContentView::NotFound,
                Some(tab) if tab.is_empty() => {
                    if minimal_mode {
                        TabContentView::EmptyState(MinimalEmptyState::new(
                            self.binding.tab_id.clone(),
                            Arc::clone(&self.service),
                        ))
                    } else {
                        TabContentView::Blank
                    }
                }
                Some(_) => {
                    let gap = effective_gap_size(
                        minimal_mode,
                        snapshot.tile_gap_size(),
                        self.minimal_gap_size,
                    );
                    let props = LayoutProps {
                        key: self.binding.tab_id.clone(),
                        contents: self.providers.get(&self.binding.tab_id, gap),
                        tab: self.binding.tab.clone(),
                        cursor_point: Arc::clone(&self.cursor_point),
                    };
                    TabContentView::Layout(self.layout.render(props))
                }
            }
        };

        self.note_branch(inner.branch());

        TabContentFrame {
            padding: self.padding.for_mode(minimal_mode),
            inner,
        }
    }

    fn note_branch(&self, branch: ContentBranch) {
        let mut last = self.last_branch.lock();
        let previous = *last;
        if previous != Some(branch) {
            tracing::debug!(
                tab_id = %self.binding.tab_id,
                from = previous.map_or("none", |b| b.as_str()),
                to = %branch,
                "Tab content transition"
            );
            *last = Some(branch);
        }
    }

    /// Wait until the loading flag, the tab object, or the settings change.
    ///
    /// A change that lands between a render and this call is not lost; the
    /// call returns right away and the host renders once more.
    pub async fn changed(&mut self) -> Result<()> {
        let watchers = &mut self.watchers;
        let result = tokio::select! {
            r = watchers.loading.changed() => r,
            r = watchers.tab.changed() => r,
            r = watchers.settings.changed() => r,
        };
        result.map_err(|_| CoreError::StoreClosed)
    }

    /// Render, hand the frame to `on_render`, wait for a change, repeat.
    /// Stops when `on_render` breaks.
    pub async fn run<F>(&mut self, mut on_render: F) -> Result<()>
    where
        F: FnMut(TabContentFrame<L::View>) -> ControlFlow<()>,
    {
        loop {
            if on_render(self.render()).is_break() {
                return Ok(());
            }
            self.changed().await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::empty_state::QUICK_ACTIONS;
    use crate::gap::MINIMAL_MODE_GAP_SIZE;
    use crate::layout::{CursorPoint, NodeModel};
    use async_trait::async_trait;
    use serde_json::json;
    use std::time::Duration;
    use tabtile_service::{LocalObjectService, ServiceError};
    use tabtile_wos::settings::{MINIMAL_MODE_KEY, TILE_GAP_SIZE_KEY};
    use tabtile_wos::BlockDef;

    /// Layout engine double that keeps the props it was given.
    #[derive(Default)]
    struct RecordingLayout {
        calls: Mutex<Vec<LayoutProps>>,
    }

    impl RecordingLayout {
        fn last(&self) -> LayoutProps {
            self.calls.lock().last().cloned().unwrap()
        }

        fn count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    impl TileLayout for RecordingLayout {
        type View = Vec<String>;

        fn render(&self, props: LayoutProps) -> Vec<String> {
            let blocks = props.tab.get().map(|t| t.blockids).unwrap_or_default();
            self.calls.lock().push(props);
            blocks
        }
    }

    /// Service double that records requests and never touches a store.
    #[derive(Default)]
    struct RecordingService {
        created: Mutex<Vec<(String, BlockDef)>>,
        deleted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ObjectService for RecordingService {
        async fn create_block(
            &self,
            tab_id: &str,
            def: BlockDef,
        ) -> tabtile_service::Result<String> {
            self.created.lock().push((tab_id.to_string(), def));
            Ok("new-block".to_string())
        }

        async fn delete_block(&self, block_id: &str) -> tabtile_service::Result<()> {
            self.deleted.lock().push(block_id.to_string());
            Err(ServiceError::Unavailable("backend offline".into()))
        }
    }

    fn env_with(
        store: &ObjectStore,
        settings: &SettingsStore,
        service: Arc<dyn ObjectService>,
    ) -> TabContentEnv {
        TabContentEnv {
            store: store.clone(),
            settings: settings.clone(),
            service,
            cursor_point: Arc::new(|| Some(CursorPoint { x: 10.0, y: 20.0 })),
            padding: PaddingConfig::default(),
            minimal_gap_size: MINIMAL_MODE_GAP_SIZE,
        }
    }

    fn tab_with_blocks(id: &str, blocks: &[&str]) -> Tab {
        let mut tab = Tab::new(id, "Main");
        tab.blockids = blocks.iter().map(|b| b.to_string()).collect();
        tab
    }

    fn setup() -> (ObjectStore, SettingsStore, Arc<RecordingService>) {
        (
            ObjectStore::new(),
            SettingsStore::new(),
            Arc::new(RecordingService::default()),
        )
    }

    #[test]
    fn test_loading_wins_over_data() {
        let (store, settings, service) = setup();
        let oref = make_oref(Tab::OTYPE, "t1");
        store.put(tab_with_blocks("t1", &["b1"]));
        store.mark_loading(&oref);

        let content =
            TabContent::new("t1", env_with(&store, &settings, service), RecordingLayout::default())
                .unwrap();
        let frame = content.render();

        assert_eq!(frame.inner.branch(), ContentBranch::Loading);
        assert_eq!(frame.inner.placeholder_text(), Some("Tab Loading"));
        assert_eq!(content.layout().count(), 0);
    }

    #[test]
    fn test_unresolved_tab_is_loading() {
        let (store, settings, service) = setup();
        let content =
            TabContent::new("t1", env_with(&store, &settings, service), RecordingLayout::default())
                .unwrap();
        assert_eq!(content.render().inner.branch(), ContentBranch::Loading);
    }

    #[test]
    fn test_missing_tab_is_not_found() {
        let (store, settings, service) = setup();
        store.mark_missing(&make_oref(Tab::OTYPE, "t1"));

        let content =
            TabContent::new("t1", env_with(&store, &settings, service), RecordingLayout::default())
                .unwrap();
        let frame = content.render();

        assert_eq!(frame.inner.branch(), ContentBranch::NotFound);
        assert_eq!(frame.inner.placeholder_text(), Some("Tab Not Found"));
    }

    #[test]
    fn test_empty_tab_without_minimal_mode_is_blank() {
        let (store, settings, service) = setup();
        store.put(tab_with_blocks("t1", &[]));

        let content =
            TabContent::new("t1", env_with(&store, &settings, service), RecordingLayout::default())
                .unwrap();
        let frame = content.render();

        assert_eq!(frame.inner.branch(), ContentBranch::Blank);
        assert_eq!(frame.inner.placeholder_text(), None);
        assert_eq!(frame.padding, Padding { top: 3, right: 3 });
    }

    #[test]
    fn test_empty_tab_in_minimal_mode_offers_quick_actions() {
        let (store, settings, service) = setup();
        store.put(tab_with_blocks("t1", &[]));
        settings.set(MINIMAL_MODE_KEY, json!(true)).unwrap();

        let content =
            TabContent::new("t1", env_with(&store, &settings, service), RecordingLayout::default())
                .unwrap();
        let frame = content.render();

        assert_eq!(frame.padding, Padding { top: 1, right: 1 });
        match frame.inner {
            TabContentView::EmptyState(empty) => {
                assert_eq!(empty.tab_id(), "t1");
                assert_eq!(empty.actions().len(), 4);
                assert_eq!(empty.actions(), &QUICK_ACTIONS[..]);
            }
            other => panic!("expected empty state, got {}", other.branch()),
        }
    }

    #[tokio::test]
    async fn test_terminal_action_issues_one_create() {
        let (store, settings, service) = setup();
        store.put(tab_with_blocks("t1", &[]));
        settings.set(MINIMAL_MODE_KEY, json!(true)).unwrap();

        let content = TabContent::new(
            "t1",
            env_with(&store, &settings, service.clone()),
            RecordingLayout::default(),
        )
        .unwrap();

        let TabContentView::EmptyState(empty) = content.render().inner else {
            panic!("expected empty state");
        };
        let terminal = empty
            .actions()
            .iter()
            .find(|a| a.label == "Terminal")
            .unwrap();
        empty.activate(terminal).await.unwrap();

        let created = service.created.lock();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].0, "t1");
        assert_eq!(created[0].1.view(), Some("term"));
    }

    #[test]
    fn test_populated_tab_delegates_to_layout() {
        let (store, settings, service) = setup();
        store.put(tab_with_blocks("t1", &["b1"]));

        let content =
            TabContent::new("t1", env_with(&store, &settings, service), RecordingLayout::default())
                .unwrap();
        let frame = content.render();

        let TabContentView::Layout(blocks) = frame.inner else {
            panic!("expected layout");
        };
        assert_eq!(blocks, vec!["b1"]);

        let props = content.layout().last();
        assert_eq!(props.key, "t1");
        assert_eq!(props.contents.tab_id, "t1");
        assert_eq!(props.contents.gap_size_px, None);
        assert_eq!(props.tab.oref(), &make_oref("tab", "t1"));
        assert_eq!((props.cursor_point)(), Some(CursorPoint { x: 10.0, y: 20.0 }));

        let view = (props.contents.render_content)(&NodeModel::new("n1", "b1"));
        assert_eq!(view.block_id, "b1");
        assert!(!view.preview);
    }

    #[test]
    fn test_bundle_identity_tracks_tab_and_gap() {
        let (store, settings, service) = setup();
        store.put(tab_with_blocks("t1", &["b1"]));
        store.put(tab_with_blocks("t2", &["b2"]));

        let mut content =
            TabContent::new("t1", env_with(&store, &settings, service), RecordingLayout::default())
                .unwrap();

        content.render();
        let first = content.layout().last().contents;

        // Unrelated change: tab title.
        store.update::<Tab>(&make_oref("tab", "t1"), |t| t.name = "Renamed".into());
        content.render();
        assert!(Arc::ptr_eq(&first, &content.layout().last().contents));

        // Minimal mode with no explicit gap moves the gap from unset to 2.
        settings.set(MINIMAL_MODE_KEY, json!(true)).unwrap();
        content.render();
        let second = content.layout().last().contents;
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.gap_size_px, Some(2.0));

        // Explicit gap of 2 yields the same effective gap, so no rebuild.
        settings.set(TILE_GAP_SIZE_KEY, json!(2)).unwrap();
        content.render();
        assert!(Arc::ptr_eq(&second, &content.layout().last().contents));

        // A fractional gap is a distinct value, not rounded back to 2.
        settings.set(TILE_GAP_SIZE_KEY, json!(2.4)).unwrap();
        content.render();
        let fractional = content.layout().last().contents;
        assert!(!Arc::ptr_eq(&second, &fractional));
        assert_eq!(fractional.gap_size_px, Some(2.4));

        content.set_tab_id("t2").unwrap();
        content.render();
        let third = content.layout().last().contents;
        assert!(!Arc::ptr_eq(&fractional, &third));
        assert_eq!(third.tab_id, "t2");
        assert_eq!(content.layout().last().key, "t2");
    }

    #[test]
    fn test_minimal_gap_comes_from_env() {
        let (store, settings, service) = setup();
        store.put(tab_with_blocks("t1", &["b1"]));
        settings.set(MINIMAL_MODE_KEY, json!(true)).unwrap();

        let mut env = env_with(&store, &settings, service);
        env.minimal_gap_size = 5.5;
        let content = TabContent::new("t1", env, RecordingLayout::default()).unwrap();

        content.render();
        assert_eq!(content.layout().last().contents.gap_size_px, Some(5.5));

        settings.set(TILE_GAP_SIZE_KEY, json!(0.4)).unwrap();
        content.render();
        assert_eq!(content.layout().last().contents.gap_size_px, Some(0.4));
    }

    #[test]
    fn test_rebinding_drops_old_tab() {
        let (store, settings, service) = setup();
        store.put(tab_with_blocks("t1", &["b1"]));
        store.mark_missing(&make_oref("tab", "t2"));

        let mut content =
            TabContent::new("t1", env_with(&store, &settings, service), RecordingLayout::default())
                .unwrap();
        assert_eq!(content.render().inner.branch(), ContentBranch::Layout);

        content.set_tab_id("t2").unwrap();
        assert_eq!(content.oref(), &make_oref("tab", "t2"));
        assert_eq!(content.render().inner.branch(), ContentBranch::NotFound);

        assert!(matches!(content.set_tab_id(""), Err(CoreError::EmptyTabId)));
        assert_eq!(content.tab_id(), "t2");
    }

    #[test]
    fn test_empty_tab_id_rejected() {
        let (store, settings, service) = setup();
        let result =
            TabContent::new("", env_with(&store, &settings, service), RecordingLayout::default());
        assert!(matches!(result, Err(CoreError::EmptyTabId)));
    }

    #[tokio::test]
    async fn test_failed_delete_stays_local_to_the_task() {
        let (store, settings, service) = setup();
        store.put(tab_with_blocks("t1", &["b1"]));

        let content = TabContent::new(
            "t1",
            env_with(&store, &settings, service.clone()),
            RecordingLayout::default(),
        )
        .unwrap();
        let contents = content.contents();

        assert!((contents.on_node_delete)(&NodeModel::new("n1", "b1"))
            .await
            .is_ok());
        assert_eq!(*service.deleted.lock(), vec!["b1".to_string()]);

        // The failed request leaves the block in place; nothing errors here.
        assert_eq!(content.render().inner.branch(), ContentBranch::Layout);
    }

    #[tokio::test]
    async fn test_changed_wakes_on_store_and_settings() {
        let (store, settings, service) = setup();
        let mut content =
            TabContent::new("t1", env_with(&store, &settings, service), RecordingLayout::default())
                .unwrap();
        assert_eq!(content.render().inner.branch(), ContentBranch::Loading);

        store.put(tab_with_blocks("t1", &[]));
        content.changed().await.unwrap();
        assert_eq!(content.render().inner.branch(), ContentBranch::Blank);

        settings.set(MINIMAL_MODE_KEY, json!(true)).unwrap();
        content.changed().await.unwrap();
        assert_eq!(content.render().inner.branch(), ContentBranch::EmptyState);
    }

    #[tokio::test]
    async fn test_run_leaves_empty_state_after_create() {
        let store = ObjectStore::new();
        let settings = SettingsStore::new();
        let service = LocalObjectService::new(store.clone());
        let tab = service.create_tab("Main");
        settings.set(MINIMAL_MODE_KEY, json!(true)).unwrap();

        let mut content = TabContent::new(
            &tab.oid,
            env_with(&store, &settings, Arc::new(service.clone())),
            RecordingLayout::default(),
        )
        .unwrap();

        let mut branches = Vec::new();
        let run = content.run(|frame| {
            branches.push(frame.inner.branch());
            match frame.inner {
                TabContentView::EmptyState(empty) => {
                    empty.activate_view("term");
                    ControlFlow::Continue(())
                }
                TabContentView::Layout(_) => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            }
        });

        tokio::time::timeout(Duration::from_secs(5), run)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(branches.first(), Some(&ContentBranch::EmptyState));
        assert_eq!(branches.last(), Some(&ContentBranch::Layout));
        assert_eq!(
            store
                .get::<Tab>(&make_oref("tab", &tab.oid))
                .unwrap()
                .blockids
                .len(),
            1
        );
    }
}
