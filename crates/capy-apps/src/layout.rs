//! Persisted grid layout: a sparse overlay of user customizations.
//!
//! Only folders and apps that deviate from the scanned defaults (hidden,
//! foldered or explicitly positioned) are stored. The scan itself is never
//! persisted; on load the overlay is merged onto a fresh catalog by name.

use crate::catalog::{Catalog, DEFAULT_FOLDER_ICON, Folder};
use crate::error::LauncherError;
use crate::paths::layout_path;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn default_folder_icon() -> String {
    DEFAULT_FOLDER_ICON.to_string()
}

/// Stored folder descriptor. Membership is carried by the app overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FolderEntry {
    pub id: String,
    pub name: String,
    #[serde(default = "default_folder_icon")]
    pub icon: String,
}

/// Per-app deviation from the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppOverride {
    pub name: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub position: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

/// The whole persisted document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub folders: Vec<FolderEntry>,
    #[serde(default)]
    pub apps: Vec<AppOverride>,
}

impl LayoutConfig {
    /// Snapshot the user customizations held by a catalog.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let folders = catalog
            .folders()
            .iter()
            .map(|folder| FolderEntry {
                id: folder.id.clone(),
                name: folder.name.clone(),
                icon: folder.icon.clone(),
            })
            .collect();

        let apps = catalog
            .apps()
            .iter()
            .filter(|app| app.is_hidden() || app.folder().is_some() || app.position().is_some())
            .map(|app| AppOverride {
                name: app.name.clone(),
                hidden: app.is_hidden(),
                position: app.position(),
                folder: app.folder().map(String::from),
            })
            .collect();

        Self { folders, apps }
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.apps.is_empty()
    }

    /// Merge the overlay onto a freshly scanned catalog.
    ///
    /// Folders keep their stored ids. Overrides for apps that are no longer
    /// installed are ignored, as are references to folders that don't exist.
    pub fn apply(&self, catalog: &mut Catalog) {
        for entry in &self.folders {
            let restored = catalog.insert_folder(Folder {
                id: entry.id.clone(),
                name: entry.name.clone(),
                icon: entry.icon.clone(),
                is_open: false,
            });
            if !restored {
                warn!("Ignoring duplicate folder id {}", entry.id);
            }
        }

        let mut applied = 0;
        for entry in &self.apps {
            if catalog.app(&entry.name).is_none() {
                debug!("No installed app named '{}', skipping override", entry.name);
                continue;
            }

            catalog.set_hidden(&entry.name, entry.hidden);
            catalog.set_position(&entry.name, entry.position);
            catalog.remove_from_folder(&entry.name);
            if let Some(folder_id) = &entry.folder {
                if !catalog.add_to_folder(&entry.name, folder_id) {
                    warn!("'{}' refers to unknown folder {}", entry.name, folder_id);
                }
            }
            applied += 1;
        }

        catalog.sort_by_position();
        catalog.renumber_folder_members();

        debug!(
            "Applied {} app overrides and {} folders",
            applied,
            self.folders.len()
        );
    }
}

/// Reads and writes the layout file.
#[derive(Clone, Debug)]
pub struct LayoutStore {
    path: PathBuf,
}

impl LayoutStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the per-user default location.
    pub fn default_location() -> Self {
        Self::new(layout_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the overlay. A missing file is an empty layout.
    pub fn load(&self) -> Result<LayoutConfig, LauncherError> {
        if !self.path.exists() {
            return Ok(LayoutConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Replace the layout file atomically (write to a sibling temp file, then rename).
    pub fn save(&self, config: &LayoutConfig) -> Result<(), LauncherError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, config)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;

        info!(
            "Saved layout ({} folders, {} overrides) to {}",
            config.folders.len(),
            config.apps.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SourceKind;
    use crate::testing::discovered;

    fn catalog_of(names: &[&str]) -> Catalog {
        Catalog::from_discovered(names.iter().map(|n| discovered(n, SourceKind::Native)).collect())
    }

    fn order(catalog: &Catalog) -> Vec<String> {
        catalog.apps().iter().map(|a| a.name.clone()).collect()
    }

    #[test]
    fn test_overlay_is_sparse() {
        let mut catalog = catalog_of(&["Calculator", "Firefox", "GIMP", "Terminal"]);
        let id = catalog.create_folder("Media");
        catalog.add_to_folder("GIMP", &id);
        catalog.hide("Terminal");

        let config = LayoutConfig::from_catalog(&catalog);

        assert_eq!(config.folders.len(), 1);
        let names: Vec<_> = config.apps.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["GIMP", "Terminal"]);
        assert_eq!(config.apps[0].folder.as_deref(), Some(id.as_str()));
        assert!(config.apps[1].hidden);
    }

    #[test]
    fn test_missing_file_is_empty_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LayoutStore::new(tmp.path().join("nope/layout.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("layout.json");
        fs::write(&path, "<launcher-config>").unwrap();

        assert!(matches!(
            LayoutStore::new(&path).load(),
            Err(LauncherError::Json(_))
        ));
    }

    #[test]
    fn test_save_creates_parents_and_escapes_names() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LayoutStore::new(tmp.path().join("deep/dir/layout.json"));
        let config = LayoutConfig {
            folders: vec![FolderEntry {
                id: "folder_1".into(),
                name: "Tools \"&\" <Stuff>".into(),
                icon: "folder".into(),
            }],
            apps: vec![AppOverride {
                name: "Quote \" Amp & Lt < Nl \n".into(),
                hidden: true,
                position: Some(4),
                folder: Some("folder_1".into()),
            }],
        };

        store.save(&config).unwrap();
        store.save(&config).unwrap();

        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_apply_restores_folders_hidden_and_order() {
        let mut before = catalog_of(&["Calculator", "Firefox", "GIMP", "Inkscape"]);
        let id = before.create_folder("Graphics");
        before.add_to_folder("Inkscape", &id);
        before.add_to_folder("GIMP", &id);
        before.hide("Calculator");
        before.move_app("GIMP", 0);
        before.recalculate_positions();

        let config = LayoutConfig::from_catalog(&before);
        let mut after = catalog_of(&["Calculator", "Firefox", "GIMP", "Inkscape"]);
        config.apply(&mut after);

        assert_eq!(order(&after), order(&before));
        assert_eq!(after.find_folder(&id).unwrap().name, "Graphics");
        assert!(after.app("Calculator").unwrap().is_hidden());
        let members: Vec<_> = after
            .folder_members(&id)
            .into_iter()
            .map(|a| a.name.clone())
            .collect();
        assert_eq!(members, vec!["GIMP", "Inkscape"]);
    }

    #[test]
    fn test_apply_drops_unknown_folder_and_missing_apps() {
        let config = LayoutConfig {
            folders: vec![],
            apps: vec![
                AppOverride {
                    name: "Firefox".into(),
                    hidden: false,
                    position: None,
                    folder: Some("folder_gone".into()),
                },
                AppOverride {
                    name: "Uninstalled".into(),
                    hidden: true,
                    position: Some(0),
                    folder: None,
                },
            ],
        };

        let mut catalog = catalog_of(&["Firefox", "GIMP"]);
        config.apply(&mut catalog);

        assert_eq!(catalog.app("Firefox").unwrap().folder(), None);
        assert_eq!(order(&catalog), vec!["Firefox", "GIMP"]);
    }

    #[test]
    fn test_positioned_apps_sort_before_new_apps() {
        let config = LayoutConfig {
            folders: vec![],
            apps: vec![
                AppOverride {
                    name: "Zed".into(),
                    hidden: false,
                    position: Some(0),
                    folder: None,
                },
                AppOverride {
                    name: "Mpv".into(),
                    hidden: false,
                    position: Some(1),
                    folder: None,
                },
            ],
        };

        let mut catalog = catalog_of(&["Alpha", "Mpv", "Zed", "Beta"]);
        config.apply(&mut catalog);

        assert_eq!(order(&catalog), vec!["Zed", "Mpv", "Alpha", "Beta"]);
    }
}
