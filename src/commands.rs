//! External command handling via stdin.
//!
//! Commands are JSON objects, one per line (JSONL):
//!
//! ```json
//! {"type": "search", "text": "fi"}
//! {"type": "nextPage"}
//! {"type": "scroll", "direction": "down"}
//! {"type": "scroll", "deltaX": 0.0, "deltaY": 0.8}
//! {"type": "beginDrag", "name": "GIMP"}
//! {"type": "drop", "target": {"app": "Firefox"}}
//! {"type": "drop", "target": {"row": 1, "col": 3}}
//! {"type": "launch", "name": "Firefox"}
//! ```

use crate::event_bus::LauncherEvent;
use capy_apps::{DropTarget, GridPosition, LauncherSession, LauncherSettings, Scroll};
use crossbeam_channel::Sender;
use log::{debug, error, info, warn};
use serde::Deserialize;
use std::io::BufRead;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Where a drag was released.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DropAt {
    App { app: String },
    Folder { folder: String },
    Cell { row: usize, col: usize },
    /// Pointer position relative to the grid origin.
    Point { x: f64, y: f64 },
}

impl DropAt {
    pub fn to_target(&self) -> DropTarget {
        match self {
            DropAt::App { app } => DropTarget::App(app.clone()),
            DropAt::Folder { folder } => DropTarget::Folder(folder.clone()),
            DropAt::Cell { row, col } => DropTarget::Empty(GridPosition::new(*row, *col)),
            DropAt::Point { x, y } => DropTarget::Empty(GridPosition::from_pixels(*x, *y)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ExternalCommand {
    Search {
        #[serde(default)]
        text: String,
    },
    NextPage,
    PrevPage,
    GoToPage {
        page: usize,
    },
    /// Either a discrete direction or smooth deltas.
    Scroll {
        #[serde(default)]
        direction: Option<ScrollDirection>,
        #[serde(default, rename = "deltaX")]
        delta_x: f64,
        #[serde(default, rename = "deltaY")]
        delta_y: f64,
    },
    Swipe {
        #[serde(rename = "velocityX")]
        velocity_x: f64,
    },
    OpenFolder {
        id: String,
    },
    CloseFolder,
    RenameFolder {
        id: String,
        name: String,
    },
    Hide {
        name: String,
    },
    Show {
        name: String,
    },
    RemoveFromFolder {
        name: String,
    },
    BeginDrag {
        name: String,
    },
    CancelDrag,
    Drop {
        target: DropAt,
    },
    Launch {
        name: String,
    },
    Dismiss,
    Rescan,
    /// Forget uninstalled apps and delete empty folders.
    PruneLayout,
    SetIcon {
        name: String,
    },
    ResetIcon,
    Snapshot,
}

impl ExternalCommand {
    fn scroll(direction: Option<ScrollDirection>, delta_x: f64, delta_y: f64) -> Scroll {
        match direction {
            Some(ScrollDirection::Up) => Scroll::Up,
            Some(ScrollDirection::Down) => Scroll::Down,
            Some(ScrollDirection::Left) => Scroll::Left,
            Some(ScrollDirection::Right) => Scroll::Right,
            None => Scroll::Smooth { delta_x, delta_y },
        }
    }

    /// Run the command against the session.
    pub fn execute(
        self,
        session: &mut LauncherSession,
        settings: &mut LauncherSettings,
        settings_path: &Path,
    ) {
        match self {
            ExternalCommand::Search { text } => session.search(&text),
            ExternalCommand::NextPage => {
                session.next_page();
            }
            ExternalCommand::PrevPage => {
                session.prev_page();
            }
            ExternalCommand::GoToPage { page } => {
                session.go_to_page(page);
            }
            ExternalCommand::Scroll {
                direction,
                delta_x,
                delta_y,
            } => {
                session.scroll(Self::scroll(direction, delta_x, delta_y));
            }
            ExternalCommand::Swipe { velocity_x } => {
                session.swipe(velocity_x);
            }
            ExternalCommand::OpenFolder { id } => {
                if !session.open_folder(&id) {
                    warn!("No folder with id {}", id);
                }
            }
            ExternalCommand::CloseFolder => session.close_folder(),
            ExternalCommand::RenameFolder { id, name } => {
                if !session.rename_folder(&id, &name) {
                    warn!("No folder with id {}", id);
                }
            }
            ExternalCommand::Hide { name } => {
                session.hide(&name);
            }
            ExternalCommand::Show { name } => {
                session.show(&name);
            }
            ExternalCommand::RemoveFromFolder { name } => {
                session.remove_from_folder(&name);
            }
            ExternalCommand::BeginDrag { name } => {
                if !session.begin_drag(&name) {
                    warn!("Cannot drag unknown app '{}'", name);
                }
            }
            ExternalCommand::CancelDrag => session.cancel_drag(),
            ExternalCommand::Drop { target } => {
                let outcome = session.drop_on(&target.to_target());
                debug!("Drop outcome: {:?}", outcome);
            }
            ExternalCommand::Launch { name } => {
                if let Err(e) = session.launch(&name) {
                    error!("Failed to launch '{}': {}", name, e);
                }
            }
            ExternalCommand::Dismiss => session.dismiss(),
            ExternalCommand::Rescan => session.rescan(),
            ExternalCommand::PruneLayout => {
                session.prune_layout();
            }
            ExternalCommand::SetIcon { name } => {
                settings.set_icon_name(&name);
                save_settings(settings, settings_path);
            }
            ExternalCommand::ResetIcon => {
                settings.reset_icon_name();
                save_settings(settings, settings_path);
            }
            ExternalCommand::Snapshot => {}
        }
    }
}

fn save_settings(settings: &LauncherSettings, path: &Path) {
    match settings.save(path) {
        Ok(()) => info!("Panel icon set to '{}'", settings.icon_name),
        Err(e) => warn!("Failed to save settings {}: {}", path.display(), e),
    }
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<ExternalCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<ExternalCommand>(line) {
        Ok(cmd) => Some(cmd),
        Err(e) => {
            warn!("Failed to parse command: {}", e);
            None
        }
    }
}

/// Read commands from stdin on a background thread.
pub fn start_stdin_listener(tx: Sender<LauncherEvent>) {
    std::thread::spawn(move || {
        debug!("External command listener started");
        let stdin = std::io::stdin();

        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if let Some(cmd) = parse_line(&line) {
                        debug!("Parsed command: {:?}", cmd);
                        if tx.send(LauncherEvent::Command(cmd)).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    error!("Error reading stdin: {}", e);
                    break;
                }
            }
        }

        let _ = tx.send(LauncherEvent::InputClosed);
        debug!("External command listener exiting");
    });
}
