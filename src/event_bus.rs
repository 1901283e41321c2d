//! Event bus between the input threads and the session loop.
//!
//! The stdin reader and the directory watcher both feed one bounded
//! crossbeam channel. The main thread owns the session and drains the
//! channel in batches, so a burst of file changes (a package install
//! touching dozens of desktop entries) costs a single rescan.

use crate::commands::ExternalCommand;
use capy_apps::WatchEvent;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

/// Channel capacity.
/// Commands block the reader when full; watch events are dropped since
/// one pending rescan already covers them.
pub const CHANNEL_CAPACITY: usize = 64;

#[derive(Clone, Debug)]
pub enum LauncherEvent {
    Command(ExternalCommand),
    AppsChanged(WatchEvent),
    /// Stdin reached EOF or failed.
    InputClosed,
}

pub fn channel() -> (Sender<LauncherEvent>, Receiver<LauncherEvent>) {
    bounded(CHANNEL_CAPACITY)
}

/// Forward a watch event without blocking the watcher thread.
pub fn send_apps_changed(tx: &Sender<LauncherEvent>, event: WatchEvent) {
    match tx.try_send(LauncherEvent::AppsChanged(event)) {
        Ok(()) | Err(TrySendError::Full(_)) => {}
        Err(TrySendError::Disconnected(_)) => log::debug!("Event loop gone, dropping watch event"),
    }
}

/// Take `first` plus everything already queued.
/// Commands keep their order; of the watch events only the latest survives,
/// placed after the commands that arrived before it.
pub fn drain_latest(first: LauncherEvent, rx: &Receiver<LauncherEvent>) -> Vec<LauncherEvent> {
    let mut events = Vec::with_capacity(8);
    events.push(first);
    events.extend(rx.try_iter());

    if events.len() <= 1 {
        return events;
    }

    let last_change = events
        .iter()
        .rposition(|event| matches!(event, LauncherEvent::AppsChanged(_)));

    events
        .into_iter()
        .enumerate()
        .filter(|(i, event)| {
            !matches!(event, LauncherEvent::AppsChanged(_)) || Some(*i) == last_change
        })
        .map(|(_, event)| event)
        .collect()
}
