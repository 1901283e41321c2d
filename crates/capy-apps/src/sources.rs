//! Discovery channels that feed the catalog.

use crate::desktop_entry::{current_desktops, parse_desktop_file};
use crate::paths::{
    flatpak_application_directories, native_application_directories,
    snap_application_directories,
};
use log::{debug, warn};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Suffix of the metadata files scanned by every directory source.
pub const DESKTOP_SUFFIX: &str = ".desktop";

/// Where a record was discovered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Native,
    Snap,
    Flatpak,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Native => "native",
            SourceKind::Snap => "snap",
            SourceKind::Flatpak => "flatpak",
        };
        f.write_str(name)
    }
}

/// A launchable program as reported by a source, already filtered by visibility.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscoveredApp {
    pub name: String,
    pub command: String,
    pub icon: Option<String>,
    pub source: SourceKind,
}

/// A discovery channel. Sources never fail: unreadable input yields fewer apps.
pub trait AppSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    fn discover(&self) -> Vec<DiscoveredApp>;
}

/// Scans a fixed list of directories for desktop entries.
pub struct DesktopDirSource {
    kind: SourceKind,
    dirs: Vec<PathBuf>,
    max_depth: usize,
    desktops: Vec<String>,
}

impl DesktopDirSource {
    pub fn new(kind: SourceKind, dirs: Vec<PathBuf>, max_depth: usize) -> Self {
        Self {
            kind,
            dirs,
            max_depth,
            desktops: current_desktops(),
        }
    }

    /// XDG application directories, including vendor subdirectories.
    pub fn native() -> Self {
        Self::new(SourceKind::Native, native_application_directories(), 3)
    }

    pub fn snap() -> Self {
        Self::new(SourceKind::Snap, snap_application_directories(), 1)
    }

    pub fn flatpak() -> Self {
        Self::new(SourceKind::Flatpak, flatpak_application_directories(), 1)
    }

    /// Override the desktop names used for OnlyShowIn/NotShowIn.
    pub fn with_desktops(mut self, desktops: Vec<String>) -> Self {
        self.desktops = desktops;
        self
    }

    fn scan_dir(&self, dir: &Path, seen_ids: &mut HashSet<String>, out: &mut Vec<DiscoveredApp>) {
        if !dir.exists() {
            return;
        }

        let walker = walkdir::WalkDir::new(dir)
            .follow_links(true)
            .max_depth(self.max_depth)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to read {} directory {}: {}", self.kind, dir.display(), e);
                    continue;
                }
            };

            let path = entry.path();
            let is_desktop_file = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.ends_with(DESKTOP_SUFFIX))
                .unwrap_or(false);
            if !is_desktop_file || entry.file_type().is_dir() {
                continue;
            }

            // Desktop file ID: path relative to the base dir with '/' -> '-'
            let desktop_id = path
                .strip_prefix(dir)
                .map(|rel| rel.to_string_lossy().replace('/', "-"))
                .unwrap_or_else(|_| path.to_string_lossy().to_string());
            if !seen_ids.insert(desktop_id) {
                continue;
            }

            let Some(app) = parse_desktop_file(path) else {
                debug!("Skipping unparsable desktop entry {}", path.display());
                continue;
            };

            if !app.should_show(&self.desktops) {
                debug!(
                    "Hiding {} ({}) on this desktop",
                    app.id,
                    app.desktop_file_path.display()
                );
                continue;
            }

            out.push(DiscoveredApp {
                name: app.name,
                command: app.exec,
                icon: app.icon_name,
                source: self.kind,
            });
        }
    }
}

impl AppSource for DesktopDirSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn discover(&self) -> Vec<DiscoveredApp> {
        let mut apps = Vec::new();
        let mut seen_ids = HashSet::new();

        for dir in &self.dirs {
            self.scan_dir(dir, &mut seen_ids, &mut apps);
        }

        debug!("{} source discovered {} apps", self.kind, apps.len());
        apps
    }
}

/// The standard source set. Native runs first so it wins name collisions.
pub fn default_sources() -> Vec<Box<dyn AppSource>> {
    vec![
        Box::new(DesktopDirSource::native()),
        Box::new(DesktopDirSource::snap()),
        Box::new(DesktopDirSource::flatpak()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_entry(dir: &Path, file: &str, body: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(file), body).unwrap();
    }

    fn entry(name: &str, exec: &str) -> String {
        format!("[Desktop Entry]\nType=Application\nName={}\nExec={}\nIcon={}\n", name, exec, exec)
    }

    #[test]
    fn test_scans_only_visible_desktop_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("applications");
        write_entry(&dir, "gimp.desktop", &entry("GIMP", "gimp"));
        write_entry(&dir, "notes.txt", &entry("Notes", "notes"));
        write_entry(
            &dir,
            "helper.desktop",
            "[Desktop Entry]\nType=Application\nName=Helper\nExec=helper\nNoDisplay=true\n",
        );
        write_entry(&dir, "broken.desktop", "garbage");

        let source = DesktopDirSource::new(SourceKind::Flatpak, vec![dir], 1).with_desktops(vec![]);
        let apps = source.discover();

        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].name, "GIMP");
        assert_eq!(apps[0].command, "gimp");
        assert_eq!(apps[0].source, SourceKind::Flatpak);
    }

    #[test]
    fn test_missing_directories_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let present = tmp.path().join("present");
        write_entry(&present, "a.desktop", &entry("Alpha", "alpha"));

        let source = DesktopDirSource::new(
            SourceKind::Snap,
            vec![tmp.path().join("missing"), present],
            1,
        )
        .with_desktops(vec![]);

        let names: Vec<_> = source.discover().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Alpha"]);
    }

    #[test]
    fn test_first_directory_wins_per_desktop_id() {
        let tmp = tempfile::tempdir().unwrap();
        let user = tmp.path().join("user");
        let system = tmp.path().join("system");
        write_entry(&user, "editor.desktop", &entry("My Editor", "editor --custom"));
        write_entry(&system, "editor.desktop", &entry("Editor", "editor"));
        write_entry(&system.join("vendor"), "tool.desktop", &entry("Tool", "tool"));

        let source = DesktopDirSource::new(SourceKind::Native, vec![user, system], 3)
            .with_desktops(vec![]);
        let mut names: Vec<_> = source.discover().into_iter().map(|a| a.name).collect();
        names.sort();

        assert_eq!(names, vec!["My Editor", "Tool"]);
    }
}
