//! capy-apps: App catalog and launcher grid model for Linux desktops.
//!
//! Provides the engine behind the full-screen app launcher:
//! - Discovery of desktop entries from the native registry, Snap and Flatpak
//! - A deduplicated catalog with user folders and manual ordering
//! - A sparse layout file that survives rescans of the installed apps
//! - Search, pagination and folder drill-down for the grid
//! - Drag and drop decisions (group, file into folder, reorder)
//! - Watching application directories for changes

mod catalog;
mod desktop_entry;
mod drag;
mod error;
mod launch;
mod layout;
mod paths;
mod session;
mod settings;
mod sources;
mod view;
mod watcher;

#[cfg(test)]
mod testing;

pub use catalog::{AppRecord, Catalog, DEFAULT_FOLDER_NAME, Folder, FolderId, collate};
pub use desktop_entry::{DesktopApp, parse_desktop_entry, parse_desktop_file};
pub use drag::{CELL_SIZE, DropOutcome, DropRejection, DropTarget, GridPosition, apply_drop};
pub use error::LauncherError;
pub use launch::{launch, strip_field_codes};
pub use layout::{AppOverride, FolderEntry, LayoutConfig, LayoutStore};
pub use paths::{config_dir, layout_path, settings_path, watch_directories};
pub use session::LauncherSession;
pub use settings::{DEFAULT_ICON_NAME, LauncherSettings};
pub use sources::{AppSource, DESKTOP_SUFFIX, DesktopDirSource, DiscoveredApp, SourceKind, default_sources};
pub use view::{
    APPS_PER_PAGE, GRID_COLUMNS, GRID_ROWS, GridItem, ItemKind, ItemRef, PageIndicator, Scroll,
    ViewState, match_range,
};
pub use watcher::{AppWatcher, WatchEvent, WatchEventKind};
