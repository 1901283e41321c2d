//! Launcher settings (panel button icon, file watching, layout location).

use crate::error::LauncherError;
use crate::layout::LayoutStore;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ICON_NAME: &str = "capy-launcher";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherSettings {
    /// Icon shown on the panel button.
    pub icon_name: String,
    /// Rescan when desktop entries change on disk.
    pub watch_applications: bool,
    /// Where the grid layout is stored; the per-user default when unset.
    pub layout_path: Option<PathBuf>,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            icon_name: DEFAULT_ICON_NAME.to_string(),
            watch_applications: true,
            layout_path: None,
        }
    }
}

impl LauncherSettings {
    /// Load from config file, or return default if not found or unreadable
    pub fn load(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring malformed settings {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Save to config file
    pub fn save(&self, path: &Path) -> Result<(), LauncherError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Set the panel button icon. Blank names fall back to the default.
    pub fn set_icon_name(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            self.reset_icon_name();
        } else {
            self.icon_name = name.to_string();
        }
    }

    pub fn reset_icon_name(&mut self) {
        self.icon_name = DEFAULT_ICON_NAME.to_string();
    }

    pub fn layout_store(&self) -> LayoutStore {
        match &self.layout_path {
            Some(path) => LayoutStore::new(path.clone()),
            None => LayoutStore::default_location(),
        }
    }
}
