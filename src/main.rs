//! capy-launcher - Full-screen app launcher grid
//!
//! Headless host: owns the launcher session, reads JSONL commands from stdin
//! and prints a JSON snapshot of the grid after each batch of changes.

mod commands;
mod event_bus;
mod render;

use capy_apps::{
    AppWatcher, LauncherSession, LauncherSettings, default_sources, settings_path,
    watch_directories,
};
use event_bus::LauncherEvent;
use log::{error, info, warn};
use render::Snapshot;
use std::error::Error;

fn emit(session: &LauncherSession, settings: &LauncherSettings) {
    let snapshot = Snapshot::capture(session, settings);
    if let Err(e) = snapshot.write_line(std::io::stdout().lock()) {
        error!("Failed to write snapshot: {}", e);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting capy-launcher...");

    let settings_path = settings_path();
    let mut settings = LauncherSettings::load(&settings_path);

    let mut session = LauncherSession::start(default_sources(), settings.layout_store());

    let (tx, rx) = event_bus::channel();

    // Keep the watcher alive for the whole loop
    let _watcher = if settings.watch_applications {
        let watch_tx = tx.clone();
        match AppWatcher::start(&watch_directories(), move |event| {
            event_bus::send_apps_changed(&watch_tx, event)
        }) {
            Ok(watcher) => {
                if watcher.watched().is_empty() {
                    warn!("No application directories exist, changes will not be picked up");
                }
                Some(watcher)
            }
            Err(e) => {
                warn!("Application directories will not be watched: {}", e);
                None
            }
        }
    } else {
        None
    };

    commands::start_stdin_listener(tx);

    // Initial state
    emit(&session, &settings);

    'events: while let Ok(first) = rx.recv() {
        for event in event_bus::drain_latest(first, &rx) {
            match event {
                LauncherEvent::Command(cmd) => {
                    cmd.execute(&mut session, &mut settings, &settings_path);
                }
                LauncherEvent::AppsChanged(change) => {
                    session.handle_watch_event(&change);
                }
                LauncherEvent::InputClosed => break 'events,
            }
        }
        emit(&session, &settings);
    }

    session.shutdown();
    info!("capy-launcher stopped");
    Ok(())
}
