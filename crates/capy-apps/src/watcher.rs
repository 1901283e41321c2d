//! Watches application directories and reports desktop entry changes.

use crate::error::LauncherError;
use crate::sources::DESKTOP_SUFFIX;
use log::{debug, info, warn};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchEventKind {
    Created,
    Deleted,
    Modified,
}

/// A change to one desktop entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchEvent {
    pub kind: WatchEventKind,
    pub file_name: String,
}

impl WatchEvent {
    fn for_path(kind: WatchEventKind, path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        if !file_name.ends_with(DESKTOP_SUFFIX) {
            return None;
        }
        Some(Self {
            kind,
            file_name: file_name.to_string(),
        })
    }

    /// Translate a notify event into the desktop entry changes it carries.
    /// Metadata and access events, and non-desktop files, produce nothing.
    pub fn from_notify(event: &Event) -> Vec<Self> {
        let kinds: Vec<WatchEventKind> = match event.kind {
            EventKind::Create(_) => vec![WatchEventKind::Created; event.paths.len()],
            EventKind::Remove(_) => vec![WatchEventKind::Deleted; event.paths.len()],
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                vec![WatchEventKind::Deleted; event.paths.len()]
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
                vec![WatchEventKind::Created; event.paths.len()]
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                vec![WatchEventKind::Deleted, WatchEventKind::Created]
            }
            EventKind::Modify(ModifyKind::Name(_))
            | EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Any) => {
                vec![WatchEventKind::Modified; event.paths.len()]
            }
            _ => Vec::new(),
        };

        event
            .paths
            .iter()
            .zip(kinds)
            .filter_map(|(path, kind)| Self::for_path(kind, path))
            .collect()
    }
}

/// Keeps the notify watcher alive; dropping it stops watching.
pub struct AppWatcher {
    _watcher: RecommendedWatcher,
    watched: Vec<PathBuf>,
}

impl AppWatcher {
    /// Watch every existing directory in `dirs` (non-recursively) and call
    /// `on_event` from the watcher thread for each desktop entry change.
    pub fn start<F>(dirs: &[PathBuf], on_event: F) -> Result<Self, LauncherError>
    where
        F: Fn(WatchEvent) + Send + 'static,
    {
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for change in WatchEvent::from_notify(&event) {
                    debug!("Application change detected: {:?}", change);
                    on_event(change);
                }
            }
            Err(e) => warn!("File watcher error: {}", e),
        })?;

        let mut watched = Vec::new();
        for dir in dirs {
            if !dir.is_dir() {
                continue;
            }
            match watcher.watch(dir, RecursiveMode::NonRecursive) {
                Ok(()) => watched.push(dir.clone()),
                Err(e) => warn!("Failed to monitor {}: {}", dir.display(), e),
            }
        }

        info!("Watching {} application directories", watched.len());
        Ok(Self {
            _watcher: watcher,
            watched,
        })
    }

    pub fn watched(&self) -> &[PathBuf] {
        &self.watched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind};
    use std::sync::mpsc;
    use std::time::Duration;

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        let mut event = Event::new(kind);
        for path in paths {
            event = event.add_path(PathBuf::from(path));
        }
        event
    }

    #[test]
    fn test_filters_suffix_and_kind() {
        let created = event(
            EventKind::Create(CreateKind::File),
            &["/apps/gimp.desktop", "/apps/readme.txt"],
        );
        assert_eq!(
            WatchEvent::from_notify(&created),
            vec![WatchEvent {
                kind: WatchEventKind::Created,
                file_name: "gimp.desktop".into(),
            }]
        );

        let removed = event(EventKind::Remove(RemoveKind::File), &["/apps/gimp.desktop"]);
        assert_eq!(WatchEvent::from_notify(&removed)[0].kind, WatchEventKind::Deleted);

        let written = event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            &["/apps/gimp.desktop"],
        );
        assert_eq!(WatchEvent::from_notify(&written)[0].kind, WatchEventKind::Modified);

        let touched = event(
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::AccessTime)),
            &["/apps/gimp.desktop"],
        );
        assert!(WatchEvent::from_notify(&touched).is_empty());
    }

    #[test]
    fn test_rename_both_reports_delete_and_create() {
        let renamed = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/apps/old.desktop", "/apps/new.desktop"],
        );
        let kinds: Vec<_> = WatchEvent::from_notify(&renamed)
            .into_iter()
            .map(|e| (e.kind, e.file_name))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (WatchEventKind::Deleted, "old.desktop".to_string()),
                (WatchEventKind::Created, "new.desktop".to_string()),
            ]
        );
    }

    #[test]
    fn test_watcher_reports_new_desktop_file() {
        let tmp = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel();
        let watcher = AppWatcher::start(
            &[tmp.path().to_path_buf(), tmp.path().join("missing")],
            move |event| {
                let _ = tx.send(event);
            },
        )
        .unwrap();
        assert_eq!(watcher.watched().len(), 1);

        std::fs::write(tmp.path().join("new.desktop"), "[Desktop Entry]\n").unwrap();

        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(event.file_name, "new.desktop");
    }
}
