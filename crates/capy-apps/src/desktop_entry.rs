//! Desktop entry parsing.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// parsed from .desktop files.
#[derive(Clone, Debug)]
pub struct DesktopApp {
    pub id: String,
    pub name: String,
    pub exec: String,
    pub icon_name: Option<String>,
    pub no_display: bool,
    pub hidden: bool,
    pub only_show_in: Vec<String>,
    pub not_show_in: Vec<String>,
    pub desktop_file_path: PathBuf,
}

impl DesktopApp {
    /// Whether the entry should be offered to the user on the given desktops
    /// (the `XDG_CURRENT_DESKTOP` components).
    pub fn should_show(&self, current_desktops: &[String]) -> bool {
        if self.no_display || self.hidden {
            return false;
        }

        if !self.only_show_in.is_empty()
            && !self
                .only_show_in
                .iter()
                .any(|d| current_desktops.iter().any(|c| c.eq_ignore_ascii_case(d)))
        {
            return false;
        }

        !self
            .not_show_in
            .iter()
            .any(|d| current_desktops.iter().any(|c| c.eq_ignore_ascii_case(d)))
    }
}

/// Desktop names from `XDG_CURRENT_DESKTOP`, e.g. "ubuntu:GNOME".
pub fn current_desktops() -> Vec<String> {
    std::env::var("XDG_CURRENT_DESKTOP")
        .map(|v| split_list(&v, ':'))
        .unwrap_or_default()
}

/// Locale keys to try for localized values, most specific first.
pub fn locale_candidates() -> Vec<String> {
    let raw = ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|v| !v.is_empty())
        .unwrap_or_default();

    // de_DE.UTF-8@euro -> de_DE
    let locale = raw
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .to_string();

    if locale.is_empty() || locale == "C" || locale == "POSIX" {
        return Vec::new();
    }

    let mut candidates = vec![locale.clone()];
    if let Some((lang, _)) = locale.split_once('_') {
        candidates.push(lang.to_string());
    }
    candidates
}

/// Parse a .desktop file into a DesktopApp struct.
pub fn parse_desktop_file(path: &Path) -> Option<DesktopApp> {
    let content = fs::read_to_string(path).ok()?;
    let id = path.file_name()?.to_string_lossy().to_string();
    let mut app = parse_desktop_entry(&content, &id, &locale_candidates())?;
    app.desktop_file_path = path.to_path_buf();
    Some(app)
}

/// Parse the `[Desktop Entry]` group of a desktop file.
///
/// Returns `None` for non-application entries or when `Name`/`Exec` is missing.
pub fn parse_desktop_entry(content: &str, id: &str, locales: &[String]) -> Option<DesktopApp> {
    let mut entries = HashMap::new();
    let mut in_desktop_entry = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            in_desktop_entry = line == "[Desktop Entry]";
            continue;
        }

        if in_desktop_entry {
            if let Some((key, value)) = line.split_once('=') {
                // First occurrence wins for duplicated keys
                entries
                    .entry(key.trim().to_string())
                    .or_insert_with(|| value.trim().to_string());
            }
        }
    }

    if entries.get("Type").map(|s| s.as_str()) != Some("Application") {
        return None;
    }

    let name = locales
        .iter()
        .find_map(|locale| entries.get(&format!("Name[{}]", locale)))
        .or_else(|| entries.get("Name"))
        .filter(|name| !name.is_empty())?
        .clone();
    let exec = entries.get("Exec")?.clone();

    Some(DesktopApp {
        id: id.to_string(),
        name,
        exec,
        icon_name: entries.get("Icon").and_then(|icon| first_icon_name(icon)),
        no_display: is_true(entries.get("NoDisplay")),
        hidden: is_true(entries.get("Hidden")),
        only_show_in: entries
            .get("OnlyShowIn")
            .map(|s| split_list(s, ';'))
            .unwrap_or_default(),
        not_show_in: entries
            .get("NotShowIn")
            .map(|s| split_list(s, ';'))
            .unwrap_or_default(),
        desktop_file_path: PathBuf::new(),
    })
}

/// Icon paths are kept as-is, themed icon lists collapse to their first name.
fn first_icon_name(value: &str) -> Option<String> {
    if value.starts_with('/') {
        return Some(value.to_string());
    }

    value
        .split([';', ','])
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(String::from)
}

fn is_true(value: Option<&String>) -> bool {
    value.map(|s| s == "true").unwrap_or(false)
}

fn split_list(value: &str, separator: char) -> Vec<String> {
    value
        .split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
