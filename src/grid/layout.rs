//! Fixed geometry of the hex grid.
//!
//! All coordinates are relative to the top-left corner of the grid widget.

use egui::{pos2, vec2, Pos2, Rect};

/// Which of the two data panes a point falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Hex,
    Ascii,
}

/// Column and row geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub bytes_per_row: usize,
    pub row_height: f32,
    /// Height of the column-index header above the first row
    pub header_height: f32,
    pub address_x: f32,
    pub hex_x: f32,
    pub hex_cell_width: f32,
    /// Horizontal gap between the hex and ASCII panes
    pub pane_gap: f32,
    pub ascii_cell_width: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::with_bytes_per_row(16)
    }
}

impl GridLayout {
    pub fn with_bytes_per_row(bytes_per_row: usize) -> Self {
        Self {
            bytes_per_row: bytes_per_row.max(1),
            row_height: 20.0,
            header_height: 20.0,
            address_x: 10.0,
            hex_x: 80.0,
            hex_cell_width: 30.0,
            pane_gap: 20.0,
            ascii_cell_width: 16.0,
        }
    }

    pub fn hex_width(&self) -> f32 {
        self.hex_cell_width * self.bytes_per_row as f32
    }

    pub fn ascii_x(&self) -> f32 {
        self.hex_x + self.hex_width() + self.pane_gap
    }

    pub fn ascii_width(&self) -> f32 {
        self.ascii_cell_width * self.bytes_per_row as f32
    }

    /// Total width of the painted content; horizontal scrolling is never needed beyond it.
    pub fn content_width(&self) -> f32 {
        self.ascii_x() + self.ascii_width() + self.pane_gap
    }

    /// Pane and column under `x`, using strict bounds on both pane edges.
    pub fn column_at(&self, x: f32) -> Option<(Pane, usize)> {
        let (pane, start, cell) = if self.hex_x < x && x < self.hex_x + self.hex_width() {
            (Pane::Hex, self.hex_x, self.hex_cell_width)
        } else if self.ascii_x() < x && x < self.ascii_x() + self.ascii_width() {
            (Pane::Ascii, self.ascii_x(), self.ascii_cell_width)
        } else {
            return None;
        };
        let column = ((x - start) / cell) as usize;
        Some((pane, column.min(self.bytes_per_row - 1)))
    }

    /// Screen row (0 = first row below the header) under `y`.
    pub fn screen_row_at(&self, y: f32) -> Option<usize> {
        if !y.is_finite() || y < self.header_height {
            return None;
        }
        Some(((y - self.header_height) / self.row_height) as usize)
    }

    /// Top edge of a screen row.
    pub fn row_top(&self, screen_row: usize) -> f32 {
        self.header_height + screen_row as f32 * self.row_height
    }

    pub fn hex_cell_rect(&self, screen_row: usize, column: usize) -> Rect {
        Rect::from_min_size(
            pos2(self.hex_x + column as f32 * self.hex_cell_width, self.row_top(screen_row)),
            vec2(self.hex_cell_width, self.row_height),
        )
    }

    pub fn ascii_cell_rect(&self, screen_row: usize, column: usize) -> Rect {
        Rect::from_min_size(
            pos2(self.ascii_x() + column as f32 * self.ascii_cell_width, self.row_top(screen_row)),
            vec2(self.ascii_cell_width, self.row_height),
        )
    }

    /// Left-center anchor of a row's address label.
    pub fn address_anchor(&self, screen_row: usize) -> Pos2 {
        pos2(self.address_x, self.row_top(screen_row) + self.row_height / 2.0)
    }

    /// Center of the header label for `column`.
    pub fn header_anchor(&self, column: usize) -> Pos2 {
        pos2(
            self.hex_x + (column as f32 + 0.5) * self.hex_cell_width,
            self.header_height / 2.0,
        )
    }
}
