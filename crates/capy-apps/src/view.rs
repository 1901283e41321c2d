//! Grid view model: search filter, folder drill-down and pagination.

use crate::catalog::{Catalog, FolderId};
use serde::Serialize;
use std::ops::Range;

pub const GRID_COLUMNS: usize = 6;
pub const GRID_ROWS: usize = 5;
pub const APPS_PER_PAGE: usize = GRID_COLUMNS * GRID_ROWS;

/// Smooth scroll deltas below this are ignored.
pub const SCROLL_THRESHOLD: f64 = 0.3;

/// A reference into the catalog for one visible grid cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemRef {
    App(String),
    Folder(FolderId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    App,
    Folder,
}

/// What the UI draws for one cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridItem {
    pub kind: ItemKind,
    /// App name or folder id.
    pub key: String,
    pub label: String,
    pub icon: Option<String>,
    pub is_active: bool,
    /// Char range of the search match inside `label`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Range<usize>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageIndicator {
    pub current: usize,
    pub total: usize,
}

impl PageIndicator {
    /// One flag per page dot, true for the active page.
    pub fn dots(&self) -> Vec<bool> {
        (0..self.total).map(|i| i == self.current).collect()
    }
}

/// Scroll input from mouse wheels and touchpads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scroll {
    Up,
    Down,
    Left,
    Right,
    Smooth { delta_x: f64, delta_y: f64 },
}

fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Char range of the first case-insensitive occurrence of `query` in `name`.
pub fn match_range(name: &str, query: &str) -> Option<Range<usize>> {
    if query.is_empty() {
        return None;
    }

    let needle = fold_case(query);
    let mut folded = String::with_capacity(name.len());
    // folded byte offset -> char index in `name`
    let mut owners = Vec::with_capacity(name.len());

    for (index, ch) in name.chars().enumerate() {
        for lower in ch.to_lowercase() {
            folded.push(lower);
            owners.resize(folded.len(), index);
        }
    }

    let start = folded.find(&needle)?;
    let end = start + needle.len();
    Some(owners[start]..owners[end - 1] + 1)
}

/// Ephemeral browsing state. Never persisted.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    search: String,
    page: usize,
    open_folder: Option<FolderId>,
    visible: Vec<ItemRef>,
}

impl ViewState {
    pub fn new(catalog: &Catalog) -> Self {
        let mut view = Self::default();
        view.refresh(catalog);
        view
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn open_folder(&self) -> Option<&str> {
        self.open_folder.as_deref()
    }

    /// The whole visible sequence for the active context.
    pub fn visible(&self) -> &[ItemRef] {
        &self.visible
    }

    fn is_searching(&self) -> bool {
        !self.search.is_empty()
    }

    /// Recompute the visible sequence against the catalog and clamp the page.
    pub fn refresh(&mut self, catalog: &Catalog) {
        if let Some(id) = &self.open_folder {
            if catalog.find_folder(id).is_none() {
                self.open_folder = None;
            }
        }

        self.visible = if self.is_searching() {
            catalog
                .apps()
                .iter()
                .filter(|app| app.is_root_visible())
                .filter(|app| match_range(&app.name, &self.search).is_some())
                .map(|app| ItemRef::App(app.name.clone()))
                .collect()
        } else if let Some(id) = &self.open_folder {
            catalog
                .folder_members(id)
                .into_iter()
                .map(|app| ItemRef::App(app.name.clone()))
                .collect()
        } else {
            catalog
                .folders()
                .iter()
                .map(|folder| ItemRef::Folder(folder.id.clone()))
                .chain(
                    catalog
                        .apps()
                        .iter()
                        .filter(|app| app.is_root_visible())
                        .map(|app| ItemRef::App(app.name.clone())),
                )
                .collect()
        };

        self.page = self.page.min(self.total_pages() - 1);
    }

    /// Set the search text and go back to the first page.
    pub fn apply_filter(&mut self, catalog: &Catalog, text: &str) {
        self.search = text.to_string();
        self.page = 0;
        self.refresh(catalog);
    }

    /// Folder contents are shown as a single page.
    pub fn total_pages(&self) -> usize {
        if self.open_folder.is_some() && !self.is_searching() {
            return 1;
        }
        self.visible.len().div_ceil(APPS_PER_PAGE).max(1)
    }

    pub fn page_indicator(&self) -> PageIndicator {
        PageIndicator {
            current: self.page,
            total: self.total_pages(),
        }
    }

    /// Offset of the current page in the visible sequence.
    pub fn page_offset(&self) -> usize {
        if self.total_pages() == 1 {
            return 0;
        }
        self.page * APPS_PER_PAGE
    }

    /// The slice of the visible sequence shown on the current page.
    pub fn page_items(&self) -> &[ItemRef] {
        if self.total_pages() == 1 {
            return &self.visible;
        }
        let start = self.page_offset().min(self.visible.len());
        let end = (start + APPS_PER_PAGE).min(self.visible.len());
        &self.visible[start..end]
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        match self.page.checked_sub(1) {
            Some(page) => self.go_to_page(page),
            None => false,
        }
    }

    /// Jump to a page. Out-of-range indices are clamped. Returns true if the page changed.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        let page = page.min(self.total_pages() - 1);
        if page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn scroll(&mut self, scroll: Scroll) -> bool {
        match scroll {
            Scroll::Up | Scroll::Left => self.prev_page(),
            Scroll::Down | Scroll::Right => self.next_page(),
            Scroll::Smooth { delta_x, delta_y } => {
                let delta = if delta_x.abs() > delta_y.abs() {
                    delta_x
                } else {
                    delta_y
                };
                if delta < -SCROLL_THRESHOLD {
                    self.prev_page()
                } else if delta > SCROLL_THRESHOLD {
                    self.next_page()
                } else {
                    false
                }
            }
        }
    }

    /// Swiping right (positive velocity) reveals the previous page.
    pub fn swipe(&mut self, velocity_x: f64) -> bool {
        if velocity_x > 0.0 {
            self.prev_page()
        } else if velocity_x < 0.0 {
            self.next_page()
        } else {
            false
        }
    }

    /// Drill into a folder. Clears the search and starts at page 0.
    pub fn enter_folder(&mut self, catalog: &mut Catalog, folder_id: &str) -> bool {
        if catalog.find_folder(folder_id).is_none() {
            return false;
        }
        catalog.set_folder_open(folder_id, true);
        self.open_folder = Some(folder_id.to_string());
        self.search.clear();
        self.page = 0;
        self.refresh(catalog);
        true
    }

    /// Back to the root view at page 0.
    pub fn leave_folder(&mut self, catalog: &mut Catalog) {
        catalog.close_all_folders();
        self.open_folder = None;
        self.page = 0;
        self.refresh(catalog);
    }

    /// Forget everything, as when the overlay is dismissed.
    pub fn reset(&mut self, catalog: &mut Catalog) {
        self.search.clear();
        self.leave_folder(catalog);
    }

    /// Build the cells of the current page.
    pub fn visible_page(&self, catalog: &Catalog, dragging: Option<&str>) -> Vec<GridItem> {
        self.page_items()
            .iter()
            .filter_map(|item| match item {
                ItemRef::Folder(id) => catalog.find_folder(id).map(|folder| GridItem {
                    kind: ItemKind::Folder,
                    key: folder.id.clone(),
                    label: folder.name.clone(),
                    icon: Some(folder.icon.clone()),
                    is_active: folder.is_open,
                    highlight: None,
                }),
                ItemRef::App(name) => catalog.app(name).map(|app| GridItem {
                    kind: ItemKind::App,
                    key: app.name.clone(),
                    label: app.name.clone(),
                    icon: app.icon.clone(),
                    is_active: dragging == Some(app.name.as_str()),
                    highlight: match_range(&app.name, &self.search),
                }),
            })
            .collect()
    }
}
