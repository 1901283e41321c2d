//! JSON snapshots of the launcher grid written to stdout.

use capy_apps::{GridItem, LauncherSession, LauncherSettings};
use serde::Serialize;
use std::io::{self, Write};

/// Everything a frontend needs to draw the overlay.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub items: Vec<GridItem>,
    pub page: usize,
    pub total_pages: usize,
    /// Page indicator, true for the current page.
    pub dots: Vec<bool>,
    pub search: String,
    pub open_folder: Option<String>,
    /// Name of the folder that is open, for the header.
    pub folder_name: Option<String>,
    pub dragging: Option<String>,
    pub icon_name: String,
}

impl Snapshot {
    pub fn capture(session: &LauncherSession, settings: &LauncherSettings) -> Self {
        let view = session.view();
        let indicator = session.page_indicator();
        let open_folder = view.open_folder().map(String::from);
        let folder_name = open_folder
            .as_deref()
            .and_then(|id| session.catalog().find_folder(id))
            .map(|folder| folder.name.clone());

        Self {
            items: session.visible_page(),
            page: indicator.current,
            total_pages: indicator.total,
            dots: indicator.dots(),
            search: view.search().to_string(),
            open_folder,
            folder_name,
            dragging: session.active_drag().map(String::from),
            icon_name: settings.icon_name.clone(),
        }
    }

    /// Write as a single JSON line and flush.
    pub fn write_line(&self, mut out: impl Write) -> io::Result<()> {
        serde_json::to_writer(&mut out, self)?;
        out.write_all(b"\n")?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capy_apps::{AppSource, DiscoveredApp, LayoutStore, SourceKind};

    struct Numbered(usize);

    impl AppSource for Numbered {
        fn kind(&self) -> SourceKind {
            SourceKind::Flatpak
        }

        fn discover(&self) -> Vec<DiscoveredApp> {
            (0..self.0)
                .map(|i| DiscoveredApp {
                    name: format!("App {:02}", i),
                    command: format!("app-{}", i),
                    icon: Some("application-x-executable".to_string()),
                    source: SourceKind::Flatpak,
                })
                .collect()
        }
    }

    #[test]
    fn test_snapshot_shape() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = LauncherSession::start(
            vec![Box::new(Numbered(31))],
            LayoutStore::new(tmp.path().join("layout.json")),
        );
        session.next_page();

        let snapshot = Snapshot::capture(&session, &LauncherSettings::default());
        let mut out = Vec::new();
        snapshot.write_line(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        let json: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(json["page"], 1);
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["dots"], serde_json::json!([false, true]));
        assert_eq!(json["items"].as_array().unwrap().len(), 1);
        assert_eq!(json["items"][0]["key"], "App 30");
        assert_eq!(json["items"][0]["kind"], "app");
        assert!(json["openFolder"].is_null());
        assert_eq!(json["iconName"], "capy-launcher");
    }
}
