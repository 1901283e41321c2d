//! The launcher session: one owner for catalog, view and drag state.
//!
//! Every user gesture and file-change notification goes through this type,
//! which keeps the view in sync and persists structural changes right away.

use crate::catalog::Catalog;
use crate::drag::{DropOutcome, DropTarget, apply_drop};
use crate::error::LauncherError;
use crate::launch;
use crate::layout::{AppOverride, LayoutConfig, LayoutStore};
use crate::sources::{AppSource, DESKTOP_SUFFIX};
use crate::view::{GridItem, PageIndicator, Scroll, ViewState};
use crate::watcher::WatchEvent;
use log::{debug, info, warn};

pub struct LauncherSession {
    sources: Vec<Box<dyn AppSource>>,
    store: LayoutStore,
    catalog: Catalog,
    view: ViewState,
    /// App currently being dragged.
    drag: Option<String>,
    /// Overrides for apps that are not installed right now, kept so a
    /// transient uninstall/reinstall doesn't lose the user's arrangement.
    orphans: Vec<AppOverride>,
    /// Last save failed; retried on the next mutation and at shutdown.
    dirty: bool,
}

impl LauncherSession {
    /// Scan all sources and merge the stored layout on top.
    pub fn start(sources: Vec<Box<dyn AppSource>>, store: LayoutStore) -> Self {
        let layout = match store.load() {
            Ok(layout) => layout,
            Err(e) => {
                warn!(
                    "Failed to load layout {}: {}, using defaults",
                    store.path().display(),
                    e
                );
                LayoutConfig::default()
            }
        };

        let mut session = Self {
            sources,
            store,
            catalog: Catalog::new(),
            view: ViewState::default(),
            drag: None,
            orphans: Vec::new(),
            dirty: false,
        };
        session.load_catalog(&layout);

        info!(
            "Launcher session started with {} apps and {} folders",
            session.catalog.apps().len(),
            session.catalog.folders().len()
        );
        session
    }

    fn load_catalog(&mut self, layout: &LayoutConfig) {
        let mut catalog = Catalog::rebuild(&self.sources);
        layout.apply(&mut catalog);

        self.orphans = layout
            .apps
            .iter()
            .filter(|entry| catalog.app(&entry.name).is_none())
            .cloned()
            .collect();

        if let Some(id) = self.view.open_folder() {
            catalog.set_folder_open(id, true);
        }
        self.catalog = catalog;
        self.view.refresh(&self.catalog);
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn store(&self) -> &LayoutStore {
        &self.store
    }

    /// The overlay as it would be written to disk.
    pub fn layout(&self) -> LayoutConfig {
        let mut layout = LayoutConfig::from_catalog(&self.catalog);
        layout.apps.extend(self.orphans.iter().cloned());
        layout
    }

    /// Write the layout. Failures are logged, never propagated.
    pub fn save(&mut self) -> bool {
        match self.store.save(&self.layout()) {
            Ok(()) => {
                self.dirty = false;
                true
            }
            Err(e) => {
                warn!("Failed to save layout {}: {}", self.store.path().display(), e);
                self.dirty = true;
                false
            }
        }
    }

    /// Re-render and persist after a structural change.
    fn commit(&mut self) {
        self.view.refresh(&self.catalog);
        self.save();
    }

    /// Replace the catalog with a fresh scan, keeping the user's layout.
    /// Does not write the layout file.
    pub fn rescan(&mut self) {
        let layout = self.layout();
        self.load_catalog(&layout);

        if let Some(source) = &self.drag {
            if self.catalog.app(source).is_none() {
                debug!("Cancelling drag of '{}', app disappeared", source);
                self.drag = None;
            }
        }
    }

    /// React to a desktop entry change. Returns true if a rescan happened.
    pub fn handle_watch_event(&mut self, event: &WatchEvent) -> bool {
        if !event.file_name.ends_with(DESKTOP_SUFFIX) {
            return false;
        }
        info!("Application change detected: {}", event.file_name);
        self.rescan();
        true
    }

    pub fn search(&mut self, text: &str) {
        self.view.apply_filter(&self.catalog, text);
    }

    pub fn next_page(&mut self) -> bool {
        self.view.next_page()
    }

    pub fn prev_page(&mut self) -> bool {
        self.view.prev_page()
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.view.go_to_page(page)
    }

    pub fn scroll(&mut self, scroll: Scroll) -> bool {
        self.view.scroll(scroll)
    }

    pub fn swipe(&mut self, velocity_x: f64) -> bool {
        self.view.swipe(velocity_x)
    }

    pub fn open_folder(&mut self, folder_id: &str) -> bool {
        self.view.enter_folder(&mut self.catalog, folder_id)
    }

    pub fn close_folder(&mut self) {
        self.view.leave_folder(&mut self.catalog);
    }

    /// Overlay dismissed: clear search and folder context.
    pub fn dismiss(&mut self) {
        self.drag = None;
        self.view.reset(&mut self.catalog);
    }

    pub fn hide(&mut self, app: &str) -> bool {
        if !self.catalog.hide(app) {
            return false;
        }
        info!("Hid '{}'", app);
        self.commit();
        true
    }

    pub fn show(&mut self, app: &str) -> bool {
        if !self.catalog.show(app) {
            return false;
        }
        self.commit();
        true
    }

    pub fn remove_from_folder(&mut self, app: &str) -> bool {
        if !self.catalog.remove_from_folder(app) {
            return false;
        }
        self.commit();
        true
    }

    pub fn rename_folder(&mut self, folder_id: &str, name: &str) -> bool {
        let Some(folder) = self.catalog.find_folder_mut(folder_id) else {
            return false;
        };
        folder.name = name.to_string();
        self.commit();
        true
    }

    /// Forget overrides of apps that are no longer installed and delete
    /// empty folders. Returns (overrides dropped, folders deleted).
    pub fn prune_layout(&mut self) -> (usize, usize) {
        let orphans = std::mem::take(&mut self.orphans).len();
        let folders = self.catalog.remove_empty_folders();
        if orphans > 0 || folders > 0 {
            info!(
                "Pruned layout: {} stale overrides, {} empty folders",
                orphans, folders
            );
            self.commit();
        }
        (orphans, folders)
    }

    /// Start dragging an app. Unknown apps leave the session idle.
    pub fn begin_drag(&mut self, app: &str) -> bool {
        if self.catalog.app(app).is_none() {
            return false;
        }
        self.drag = Some(app.to_string());
        true
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    pub fn active_drag(&self) -> Option<&str> {
        self.drag.as_deref()
    }

    /// Finish the in-flight drag on `target`.
    pub fn drop_on(&mut self, target: &DropTarget) -> DropOutcome {
        let source = self.drag.take();
        let outcome = apply_drop(
            &mut self.catalog,
            source.as_deref(),
            target,
            self.view.page(),
        );

        if outcome.is_success() {
            self.commit();
        } else {
            debug!("Drop rejected: {:?}", outcome);
        }
        outcome
    }

    /// Start an app and dismiss the overlay.
    pub fn launch(&mut self, app: &str) -> Result<(), LauncherError> {
        let command = self
            .catalog
            .app(app)
            .map(|record| record.command.clone())
            .ok_or_else(|| LauncherError::Launch(format!("no app named '{}'", app)))?;

        launch::launch(&command)?;
        self.dismiss();
        Ok(())
    }

    pub fn visible_page(&self) -> Vec<GridItem> {
        self.view.visible_page(&self.catalog, self.active_drag())
    }

    pub fn page_indicator(&self) -> PageIndicator {
        self.view.page_indicator()
    }

    /// Flush a save that failed earlier.
    pub fn shutdown(mut self) {
        if self.dirty {
            self.save();
        }
        info!("Launcher session closed");
    }
}
