//! Scroll, viewport and pointer state of the hex grid.
//!
//! `GridView` owns everything the renderer needs: the record map, the current
//! scroll row and the viewport height. Pointer input is fed in through
//! `pointer_moved`/`pointer_released`, which return a [`GridEvent`] when the
//! pointer interacts with a populated cell.

use super::layout::{GridLayout, Pane};
use crate::record::{AccessMap, AccessRecord};
use egui::{Pos2, Rect};
use std::ops::Range;

/// Events raised towards the embedding UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    /// Pointer moved onto a populated cell
    Hover(AccessRecord),
    /// Primary button released over a populated cell
    PrimaryActivate(AccessRecord),
    /// Secondary button released over a populated cell
    SecondaryActivate(AccessRecord),
}

impl GridEvent {
    pub fn record(&self) -> &AccessRecord {
        match self {
            GridEvent::Hover(r) | GridEvent::PrimaryActivate(r) | GridEvent::SecondaryActivate(r) => r,
        }
    }
}

/// Cursor the embedding UI should show over the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorKind {
    #[default]
    Default,
    Pointing,
}

/// One cell inside the viewport, ready to paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleCell {
    pub offset: u64,
    pub screen_row: usize,
    pub column: usize,
    pub hex_rect: Rect,
    pub ascii_rect: Rect,
    pub record: Option<AccessRecord>,
}

/// Virtualized hex/ASCII grid over a sparse [`AccessMap`].
pub struct GridView {
    layout: GridLayout,
    records: AccessMap,
    total_rows: usize,
    scroll_row: usize,
    viewport_height: f32,
    hovered_offset: Option<u64>,
    cursor: CursorKind,
}

impl GridView {
    pub fn new(layout: GridLayout, records: AccessMap) -> Self {
        let mut view = Self {
            layout,
            records: AccessMap::new(),
            total_rows: 0,
            scroll_row: 0,
            viewport_height: 0.0,
            hovered_offset: None,
            cursor: CursorKind::Default,
        };
        view.set_records(records);
        view
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn records(&self) -> &AccessMap {
        &self.records
    }

    /// Replaces the data and recomputes the scroll range.
    pub fn set_records(&mut self, records: AccessMap) {
        let bytes_per_row = self.layout.bytes_per_row as u64;
        self.total_rows = records
            .max_offset()
            .map(|max| (max / bytes_per_row + 1) as usize)
            .unwrap_or(0);
        self.records = records;
        self.hovered_offset = None;
        self.cursor = CursorKind::Default;
        self.clamp_scroll();
    }

    /// Updates the viewport height (in points) and recomputes the scroll range.
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(0.0);
        self.clamp_scroll();
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    fn rows_area_height(&self) -> f32 {
        (self.viewport_height - self.layout.header_height).max(0.0)
    }

    /// Rows that intersect the viewport, including a partially visible last row.
    pub fn visible_rows(&self) -> usize {
        (self.rows_area_height() / self.layout.row_height).ceil() as usize
    }

    /// Rows that fit completely; one page of scrolling.
    pub fn page_step(&self) -> usize {
        ((self.rows_area_height() / self.layout.row_height).floor() as usize).max(1)
    }

    /// Largest scroll row that still fills the viewport.
    pub fn max_scroll_row(&self) -> usize {
        self.total_rows.saturating_sub(self.page_step())
    }

    pub fn scroll_row(&self) -> usize {
        self.scroll_row
    }

    pub fn set_scroll_row(&mut self, row: usize) {
        self.scroll_row = row.min(self.max_scroll_row());
    }

    pub fn scroll_by_rows(&mut self, delta: i64) {
        let target = if delta < 0 {
            self.scroll_row.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.scroll_row.saturating_add(delta as usize)
        };
        self.set_scroll_row(target);
    }

    pub fn page_down(&mut self) {
        self.scroll_by_rows(self.page_step() as i64);
    }

    pub fn page_up(&mut self) {
        self.scroll_by_rows(-(self.page_step() as i64));
    }

    fn clamp_scroll(&mut self) {
        self.scroll_row = self.scroll_row.min(self.max_scroll_row());
    }

    /// Absolute rows currently on screen.
    pub fn visible_row_range(&self) -> Range<usize> {
        let first = self.scroll_row.min(self.total_rows);
        let last = (self.scroll_row + self.visible_rows()).min(self.total_rows);
        first..last
    }

    /// Hex label of an absolute row's first offset.
    pub fn row_label(&self, row: usize) -> String {
        format!("{:#x}", row * self.layout.bytes_per_row)
    }

    /// Every cell on screen, populated or not.
    pub fn visible_cells(&self) -> Vec<VisibleCell> {
        let bytes_per_row = self.layout.bytes_per_row;
        let range = self.visible_row_range();
        let mut cells = Vec::with_capacity(range.len() * bytes_per_row);

        for row in range {
            let screen_row = row - self.scroll_row;
            for column in 0..bytes_per_row {
                let offset = (row * bytes_per_row + column) as u64;
                cells.push(VisibleCell {
                    offset,
                    screen_row,
                    column,
                    hex_rect: self.layout.hex_cell_rect(screen_row, column),
                    ascii_rect: self.layout.ascii_cell_rect(screen_row, column),
                    record: self.records.get(offset).copied(),
                });
            }
        }
        cells
    }

    /// Offset of the populated cell under a point relative to the grid origin.
    ///
    /// Points below the last row on screen hit nothing.
    pub fn locate(&self, x: f32, y: f32) -> Option<u64> {
        let screen_row = self.layout.screen_row_at(y)?;
        if screen_row >= self.visible_rows() {
            return None;
        }
        let (_pane, column) = self.layout.column_at(x)?;
        let offset = self
            .scroll_row
            .checked_add(screen_row)?
            .checked_mul(self.layout.bytes_per_row)?
            .checked_add(column)?;
        let offset = u64::try_from(offset).ok()?;
        self.records.contains(offset).then_some(offset)
    }

    /// Like [`locate`](Self::locate) but also reports which pane was hit.
    pub fn locate_pane(&self, x: f32, y: f32) -> Option<(Pane, u64)> {
        let offset = self.locate(x, y)?;
        let (pane, _) = self.layout.column_at(x)?;
        Some((pane, offset))
    }

    pub fn record_at(&self, pos: Pos2) -> Option<&AccessRecord> {
        self.locate(pos.x, pos.y).and_then(|offset| self.records.get(offset))
    }

    pub fn cursor(&self) -> CursorKind {
        self.cursor
    }

    pub fn hovered_offset(&self) -> Option<u64> {
        self.hovered_offset
    }

    /// Feeds the current pointer position (`None` when outside the grid).
    ///
    /// Emits `Hover` whenever the populated cell under the pointer changes.
    pub fn pointer_moved(&mut self, pos: Option<Pos2>) -> Option<GridEvent> {
        let record = pos.and_then(|p| self.record_at(p)).copied();
        match record {
            Some(record) => {
                self.cursor = CursorKind::Pointing;
                if self.hovered_offset == Some(record.offset) {
                    return None;
                }
                self.hovered_offset = Some(record.offset);
                Some(GridEvent::Hover(record))
            }
            None => {
                self.cursor = CursorKind::Default;
                self.hovered_offset = None;
                None
            }
        }
    }

    /// Feeds a button release at `pos`.
    pub fn pointer_released(&mut self, pos: Pos2, button: egui::PointerButton) -> Option<GridEvent> {
        let record = *self.record_at(pos)?;
        match button {
            egui::PointerButton::Primary => Some(GridEvent::PrimaryActivate(record)),
            egui::PointerButton::Secondary => Some(GridEvent::SecondaryActivate(record)),
            _ => None,
        }
    }
}
