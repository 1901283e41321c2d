//! Drag and drop decisions.
//!
//! A drop onto another app creates a folder, a drop onto a folder files the
//! app into it, and a drop onto an empty cell reorders the catalog.

use crate::catalog::{Catalog, DEFAULT_FOLDER_NAME, FolderId};
use crate::view::{APPS_PER_PAGE, GRID_COLUMNS, GRID_ROWS};
use log::{debug, info};

/// Pixel size of one grid cell.
pub const CELL_SIZE: f64 = 130.0;

/// A cell on the current page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridPosition {
    pub row: usize,
    pub col: usize,
}

impl GridPosition {
    /// A cell, clamped to the grid bounds.
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row: row.min(GRID_ROWS - 1),
            col: col.min(GRID_COLUMNS - 1),
        }
    }

    /// Cell under a pointer position relative to the grid's origin.
    pub fn from_pixels(x: f64, y: f64) -> Self {
        let cell = |v: f64, max: usize| ((v.max(0.0) / CELL_SIZE) as usize).min(max - 1);
        Self {
            row: cell(y, GRID_ROWS),
            col: cell(x, GRID_COLUMNS),
        }
    }

    /// Index in the catalog's primary sequence for a drop on `page`.
    /// Out-of-grid cells count as the nearest cell on the page.
    pub fn linear_index(&self, page: usize) -> usize {
        let cell = Self::new(self.row, self.col);
        page.saturating_mul(APPS_PER_PAGE)
            .saturating_add(cell.row * GRID_COLUMNS + cell.col)
    }
}

/// What the dragged app was released over.
#[derive(Clone, Debug, PartialEq)]
pub enum DropTarget {
    App(String),
    Folder(FolderId),
    Empty(GridPosition),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropRejection {
    NoActiveDrag,
    SourceMissing,
    TargetMissing,
    SameApp,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    FolderCreated(FolderId),
    AddedToFolder(FolderId),
    Moved { index: usize },
    Rejected(DropRejection),
}

impl DropOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, DropOutcome::Rejected(_))
    }
}

/// Apply a drop to the catalog. Rejected drops leave the catalog untouched.
pub fn apply_drop(
    catalog: &mut Catalog,
    source: Option<&str>,
    target: &DropTarget,
    page: usize,
) -> DropOutcome {
    let Some(source) = source else {
        return DropOutcome::Rejected(DropRejection::NoActiveDrag);
    };
    if catalog.app(source).is_none() {
        debug!("Drag source '{}' vanished, ignoring drop", source);
        return DropOutcome::Rejected(DropRejection::SourceMissing);
    }

    match target {
        DropTarget::App(other) if other == source => DropOutcome::Rejected(DropRejection::SameApp),
        DropTarget::App(other) => {
            if catalog.app(other).is_none() {
                return DropOutcome::Rejected(DropRejection::TargetMissing);
            }
            let folder_id = catalog.create_folder(DEFAULT_FOLDER_NAME);
            catalog.add_to_folder(source, &folder_id);
            catalog.add_to_folder(other, &folder_id);
            info!("Grouped '{}' and '{}' into {}", source, other, folder_id);
            DropOutcome::FolderCreated(folder_id)
        }
        DropTarget::Folder(folder_id) => {
            if !catalog.add_to_folder(source, folder_id) {
                return DropOutcome::Rejected(DropRejection::TargetMissing);
            }
            info!("Moved '{}' into {}", source, folder_id);
            DropOutcome::AddedToFolder(folder_id.clone())
        }
        DropTarget::Empty(position) => {
            let requested = position.linear_index(page);
            catalog.move_app(source, requested);
            catalog.recalculate_positions();
            let index = catalog
                .apps()
                .iter()
                .position(|app| app.name == source)
                .unwrap_or(requested);
            info!("Moved '{}' to position {}", source, index);
            DropOutcome::Moved { index }
        }
    }
}
