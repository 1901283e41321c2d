//! Path helpers for XDG directories and config files.

use std::path::PathBuf;

const APP_DIR_NAME: &str = "capy-launcher";

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(std::env::var("HOME").unwrap_or_default()))
}

fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

fn xdg_data_dirs() -> Vec<PathBuf> {
    std::env::var("XDG_DATA_DIRS")
        .unwrap_or_else(|_| "/usr/local/share:/usr/share".to_string())
        .split(':')
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Application directories of the native desktop registry, highest priority first.
pub fn native_application_directories() -> Vec<PathBuf> {
    let mut dirs = vec![xdg_data_home().join("applications")];

    for data_dir in xdg_data_dirs() {
        dirs.push(data_dir.join("applications"));
    }

    dirs
}

/// Snap exports its launchers into a single system directory.
pub fn snap_application_directories() -> Vec<PathBuf> {
    vec![PathBuf::from("/var/lib/snapd/desktop/applications")]
}

/// System-wide and per-user Flatpak export directories.
pub fn flatpak_application_directories() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/var/lib/flatpak/exports/share/applications"),
        home_dir().join(".local/share/flatpak/exports/share/applications"),
    ]
}

/// Directories watched for launcher changes.
///
/// Missing entries are fine, the watcher skips them.
pub fn watch_directories() -> Vec<PathBuf> {
    let home = home_dir();
    let mut dirs = vec![
        PathBuf::from("/usr/share/applications"),
        PathBuf::from("/usr/local/share/applications"),
        PathBuf::from("/var/lib/snapd/desktop/applications"),
        PathBuf::from("/var/lib/flatpak/exports/share/applications"),
        xdg_data_home().join("applications"),
        home.join("snap"),
        home.join(".local/share/flatpak/exports/share/applications"),
    ];
    dirs.dedup();
    dirs
}

/// Per-user configuration directory, e.g. ~/.config/capy-launcher
pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .ok()
        .or_else(dirs::config_dir)
        .unwrap_or_else(|| home_dir().join(".config"))
        .join(APP_DIR_NAME)
}

/// Default location of the persisted grid layout.
pub fn layout_path() -> PathBuf {
    config_dir().join("layout.json")
}

/// Default location of the launcher settings.
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}
