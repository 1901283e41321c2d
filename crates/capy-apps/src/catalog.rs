//! App Catalog implementation.
//!
//! The catalog owns the deduplicated, ordered list of app records and the
//! user's folders. Folder membership lives only on the record (`folder`);
//! a folder's member list is derived from it, ordered by join sequence.

use crate::sources::{AppSource, DiscoveredApp, SourceKind};
use feruca::Collator;
use log::{debug, info};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

/// Folder identifier, e.g. "folder_1718000000000000".
pub type FolderId = String;

pub const DEFAULT_FOLDER_NAME: &str = "New Folder";
pub const DEFAULT_FOLDER_ICON: &str = "folder";

/// One launchable application. Identity is the display name.
#[derive(Clone, Debug, PartialEq)]
pub struct AppRecord {
    pub name: String,
    pub command: String,
    pub icon: Option<String>,
    pub source: SourceKind,
    pub(crate) hidden: bool,
    pub(crate) folder: Option<FolderId>,
    pub(crate) position: Option<usize>,
    /// Order in which the app joined its folder.
    folder_seq: u64,
}

impl AppRecord {
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Shown on the root grid: neither hidden nor tucked into a folder.
    pub fn is_root_visible(&self) -> bool {
        !self.hidden && self.folder.is_none()
    }
}

impl From<DiscoveredApp> for AppRecord {
    fn from(app: DiscoveredApp) -> Self {
        Self {
            name: app.name,
            command: app.command,
            icon: app.icon,
            source: app.source,
            hidden: false,
            folder: None,
            position: None,
            folder_seq: 0,
        }
    }
}

/// A user-created group of apps.
#[derive(Clone, Debug, PartialEq)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    pub icon: String,
    pub is_open: bool,
}

thread_local! {
    static COLLATOR: RefCell<Collator> = RefCell::new(Collator::default());
}

/// Name ordering by the Unicode Collation Algorithm (CLDR root), raw string
/// as tie-breaker so the order is total.
pub fn collate(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| collator.borrow_mut().collate(a, b))
        .then_with(|| a.cmp(b))
}

/// Explicit positions first (ascending), then unpositioned apps by name.
fn compare_by_position(a: &AppRecord, b: &AppRecord) -> Ordering {
    match (a.position, b.position) {
        (Some(pa), Some(pb)) => pa.cmp(&pb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => collate(&a.name, &b.name),
    }
}

/// The main application catalog.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    apps: Vec<AppRecord>,
    folders: Vec<Folder>,
    next_seq: u64,
    last_folder_stamp: u128,
}

impl Catalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan every source in order and build a fresh catalog.
    pub fn rebuild(sources: &[Box<dyn AppSource>]) -> Self {
        info!("Scanning app catalog...");

        let mut discovered: Vec<DiscoveredApp> = Vec::new();
        for source in sources {
            let apps = source.discover();
            debug!("{} source yielded {} apps", source.kind(), apps.len());
            discovered.extend(apps);
        }
        let catalog = Self::from_discovered(discovered);

        info!("App catalog scan complete: {} apps", catalog.apps.len());
        catalog
    }

    /// Deduplicate by exact name (first seen wins) and sort by name.
    pub fn from_discovered(discovered: Vec<DiscoveredApp>) -> Self {
        let mut seen = HashSet::new();
        let mut apps = Vec::with_capacity(discovered.len());

        for app in discovered {
            if !seen.insert(app.name.clone()) {
                debug!("Dropping duplicate '{}' from {} source", app.name, app.source);
                continue;
            }
            apps.push(AppRecord::from(app));
        }

        apps.sort_by(|a, b| collate(&a.name, &b.name));

        Self {
            apps,
            ..Self::default()
        }
    }

    pub fn apps(&self) -> &[AppRecord] {
        &self.apps
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn app(&self, name: &str) -> Option<&AppRecord> {
        self.apps.iter().find(|app| app.name == name)
    }

    fn app_mut(&mut self, name: &str) -> Option<&mut AppRecord> {
        self.apps.iter_mut().find(|app| app.name == name)
    }

    pub fn find_folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|folder| folder.id == id)
    }

    pub(crate) fn find_folder_mut(&mut self, id: &str) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|folder| folder.id == id)
    }

    /// Create an empty folder with a fresh, session-unique id.
    pub fn create_folder(&mut self, name: &str) -> FolderId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros())
            .unwrap_or_default();
        let mut stamp = now.max(self.last_folder_stamp + 1);
        while self.find_folder(&format!("folder_{}", stamp)).is_some() {
            stamp += 1;
        }
        self.last_folder_stamp = stamp;

        let id = format!("folder_{}", stamp);
        self.folders.push(Folder {
            id: id.clone(),
            name: name.to_string(),
            icon: DEFAULT_FOLDER_ICON.to_string(),
            is_open: false,
        });
        info!("Created folder '{}' ({})", name, id);
        id
    }

    /// Register a folder that already has an id (restored from disk).
    /// Returns false if the id is taken.
    pub(crate) fn insert_folder(&mut self, folder: Folder) -> bool {
        if self.find_folder(&folder.id).is_some() {
            return false;
        }
        self.folders.push(folder);
        true
    }

    /// Move an app into a folder, leaving any folder it was in before.
    pub fn add_to_folder(&mut self, app: &str, folder_id: &str) -> bool {
        if self.find_folder(folder_id).is_none() {
            return false;
        }

        let seq = self.next_seq;
        let Some(record) = self.app_mut(app) else {
            return false;
        };

        record.folder = Some(folder_id.to_string());
        record.folder_seq = seq;
        self.next_seq += 1;
        true
    }

    /// Take an app out of its folder. Returns false if it wasn't in one.
    pub fn remove_from_folder(&mut self, app: &str) -> bool {
        match self.app_mut(app) {
            Some(record) if record.folder.is_some() => {
                record.folder = None;
                record.folder_seq = 0;
                true
            }
            _ => false,
        }
    }

    /// Members of a folder in the order they were dropped in.
    pub fn folder_members(&self, folder_id: &str) -> Vec<&AppRecord> {
        let mut members: Vec<&AppRecord> = self
            .apps
            .iter()
            .filter(|app| app.folder.as_deref() == Some(folder_id))
            .collect();
        members.sort_by_key(|app| app.folder_seq);
        members
    }

    /// Persist the current order: every app's position becomes its index.
    pub fn recalculate_positions(&mut self) {
        for (index, app) in self.apps.iter_mut().enumerate() {
            app.position = Some(index);
        }
    }

    /// Remove an app from the primary sequence and reinsert it at `index`
    /// (clamped to the end of the list).
    pub fn move_app(&mut self, app: &str, index: usize) -> bool {
        let Some(from) = self.apps.iter().position(|record| record.name == app) else {
            return false;
        };

        let record = self.apps.remove(from);
        let to = index.min(self.apps.len());
        self.apps.insert(to, record);
        true
    }

    pub fn hide(&mut self, app: &str) -> bool {
        self.set_hidden(app, true)
    }

    pub fn show(&mut self, app: &str) -> bool {
        self.set_hidden(app, false)
    }

    pub(crate) fn set_hidden(&mut self, app: &str, hidden: bool) -> bool {
        match self.app_mut(app) {
            Some(record) => {
                record.hidden = hidden;
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_position(&mut self, app: &str, position: Option<usize>) -> bool {
        match self.app_mut(app) {
            Some(record) => {
                record.position = position;
                true
            }
            None => false,
        }
    }

    /// Order by explicit position, falling back to name for unpositioned apps.
    pub fn sort_by_position(&mut self) {
        self.apps.sort_by(compare_by_position);
    }

    /// Reset folder join order to follow catalog order.
    pub(crate) fn renumber_folder_members(&mut self) {
        let mut seq = 0;
        for app in self.apps.iter_mut().filter(|app| app.folder.is_some()) {
            app.folder_seq = seq;
            seq += 1;
        }
        self.next_seq = seq;
    }

    /// Delete folders that have no members. Returns how many went away.
    pub fn remove_empty_folders(&mut self) -> usize {
        let before = self.folders.len();
        let apps = &self.apps;
        self.folders
            .retain(|folder| apps.iter().any(|app| app.folder.as_deref() == Some(folder.id.as_str())));
        before - self.folders.len()
    }

    pub(crate) fn set_folder_open(&mut self, folder_id: &str, open: bool) {
        for folder in &mut self.folders {
            folder.is_open = open && folder.id == folder_id;
        }
    }

    pub(crate) fn close_all_folders(&mut self) {
        for folder in &mut self.folders {
            folder.is_open = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StaticSource, discovered};

    fn catalog_of(names: &[&str]) -> Catalog {
        Catalog::from_discovered(names.iter().map(|n| discovered(n, SourceKind::Native)).collect())
    }

    fn names(catalog: &Catalog) -> Vec<&str> {
        catalog.apps().iter().map(|a| a.name.as_str()).collect()
    }

    fn assert_folder_invariant(catalog: &Catalog) {
        for app in catalog.apps() {
            if let Some(id) = app.folder() {
                assert!(catalog.find_folder(id).is_some(), "{} points at missing folder", app.name);
            }
        }
        for folder in catalog.folders() {
            for member in catalog.folder_members(&folder.id) {
                assert_eq!(member.folder(), Some(folder.id.as_str()));
            }
        }
    }

    #[test]
    fn test_rebuild_dedups_first_source_wins() {
        let sources: Vec<Box<dyn AppSource>> = vec![
            Box::new(StaticSource::new(SourceKind::Native, &["Firefox", "GIMP"])),
            Box::new(StaticSource::new(SourceKind::Flatpak, &["Firefox", "Calculator"])),
        ];

        let catalog = Catalog::rebuild(&sources);

        assert_eq!(names(&catalog), vec!["Calculator", "Firefox", "GIMP"]);
        assert_eq!(catalog.app("Firefox").unwrap().source, SourceKind::Native);
    }

    #[test]
    fn test_collation_ignores_case() {
        let catalog = catalog_of(&["zsh", "Alacritty", "btop", "Blender"]);
        assert_eq!(names(&catalog), vec!["Alacritty", "Blender", "btop", "zsh"]);
    }

    #[test]
    fn test_collation_places_accented_names_with_their_base_letter() {
        let catalog = catalog_of(&["Zed", "Émulateur", "Editor", "Ångström", "Bottles"]);
        assert_eq!(
            names(&catalog),
            vec!["Ångström", "Bottles", "Editor", "Émulateur", "Zed"]
        );
    }

    #[test]
    fn test_add_to_folder_moves_between_folders() {
        let mut catalog = catalog_of(&["Firefox", "GIMP", "Inkscape"]);
        let graphics = catalog.create_folder("Graphics");
        let web = catalog.create_folder("Web");
        assert_ne!(graphics, web);

        assert!(catalog.add_to_folder("Inkscape", &graphics));
        assert!(catalog.add_to_folder("GIMP", &graphics));
        assert!(catalog.add_to_folder("GIMP", &web));
        assert_folder_invariant(&catalog);

        let graphics_members: Vec<_> = catalog
            .folder_members(&graphics)
            .iter()
            .map(|a| a.name.clone())
            .collect();
        assert_eq!(graphics_members, vec!["Inkscape"]);
        assert_eq!(catalog.folder_members(&web).len(), 1);
    }

    #[test]
    fn test_members_keep_drop_order() {
        let mut catalog = catalog_of(&["Alpha", "Beta", "Gamma"]);
        let id = catalog.create_folder("Mixed");
        catalog.add_to_folder("Gamma", &id);
        catalog.add_to_folder("Alpha", &id);
        catalog.add_to_folder("Beta", &id);

        let members: Vec<_> = catalog
            .folder_members(&id)
            .into_iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(members, vec!["Gamma", "Alpha", "Beta"]);
    }

    #[test]
    fn test_add_to_unknown_folder_is_noop() {
        let mut catalog = catalog_of(&["Firefox"]);
        assert!(!catalog.add_to_folder("Firefox", "folder_missing"));
        assert!(!catalog.add_to_folder("Nope", "folder_missing"));
        assert_eq!(catalog.app("Firefox").unwrap().folder(), None);
    }

    #[test]
    fn test_remove_from_folder() {
        let mut catalog = catalog_of(&["Firefox", "GIMP"]);
        let id = catalog.create_folder("Stuff");
        catalog.add_to_folder("Firefox", &id);

        assert!(catalog.remove_from_folder("Firefox"));
        assert!(!catalog.remove_from_folder("Firefox"));
        assert!(catalog.folder_members(&id).is_empty());
        assert!(catalog.app("Firefox").unwrap().is_root_visible());
        assert_folder_invariant(&catalog);
    }

    #[test]
    fn test_move_and_recalculate_positions() {
        let mut catalog = catalog_of(&["A", "B", "C", "D"]);
        assert!(catalog.move_app("D", 1));
        assert!(catalog.move_app("A", 99));
        catalog.recalculate_positions();

        assert_eq!(names(&catalog), vec!["D", "B", "C", "A"]);
        let positions: Vec<_> = catalog.apps().iter().map(|a| a.position()).collect();
        assert_eq!(positions, vec![Some(0), Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_sort_by_position() {
        let mut catalog = catalog_of(&["Alpha", "Beta", "Gamma", "Delta"]);
        catalog.set_position("Gamma", Some(0));
        catalog.set_position("Beta", Some(1));
        catalog.sort_by_position();

        assert_eq!(names(&catalog), vec!["Gamma", "Beta", "Alpha", "Delta"]);
    }

    #[test]
    fn test_remove_empty_folders() {
        let mut catalog = catalog_of(&["Firefox", "GIMP"]);
        let kept = catalog.create_folder("Kept");
        let emptied = catalog.create_folder("Emptied");
        catalog.add_to_folder("GIMP", &emptied);
        catalog.add_to_folder("GIMP", &kept);

        assert_eq!(catalog.remove_empty_folders(), 1);
        assert!(catalog.find_folder(&emptied).is_none());
        assert!(catalog.find_folder(&kept).is_some());
        assert_folder_invariant(&catalog);
    }

    #[test]
    fn test_hide_and_show() {
        let mut catalog = catalog_of(&["Firefox"]);
        assert!(catalog.hide("Firefox"));
        assert!(catalog.app("Firefox").unwrap().is_hidden());
        assert_eq!(catalog.apps().len(), 1);
        assert!(catalog.show("Firefox"));
        assert!(!catalog.app("Firefox").unwrap().is_hidden());
        assert!(!catalog.hide("Missing"));
    }
}
