//! Hex grid rendering
//!
//! Paints the column header, the address column and the hex/ASCII cells of
//! the rows currently in the viewport. Only visible rows are drawn.

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke};
use rmemviz::{AccessRecord, GridColors, GridView, Rgb};

const FONT_SIZE: f32 = 13.0;

/// Colors and decorations of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    /// Background fill; `None` leaves the grid background showing
    pub fill: Option<Color32>,
    pub text: Color32,
    pub baseline: Color32,
    /// Draw a vertical separator on the left edge (first byte of a value)
    pub separator: bool,
}

/// Computes how a cell is drawn.
///
/// Populated cells are filled with their instruction color and use the
/// contrasting color for text and baseline; empty cells use the contrast of
/// the background.
pub fn cell_style(record: Option<&AccessRecord>, background: Rgb) -> CellStyle {
    match record {
        Some(record) => {
            let contrast = record.color.contrast();
            CellStyle {
                fill: Some(record.color.into()),
                text: contrast.into(),
                baseline: contrast.into(),
                separator: record.is_value_start,
            }
        }
        None => {
            let contrast = background.contrast();
            CellStyle {
                fill: None,
                text: contrast.into(),
                baseline: contrast.into(),
                separator: false,
            }
        }
    }
}

/// Renders the whole grid.
///
/// # Arguments
/// * `painter` - Painter clipped to the grid area
/// * `origin` - Screen position of the grid's top-left corner
/// * `grid` - Grid model providing layout, scroll position and records
/// * `colors` - Non-record colors
pub fn render_grid(painter: &egui::Painter, origin: Pos2, grid: &GridView, colors: &GridColors) {
    let layout = grid.layout();
    let font = FontId::monospace(FONT_SIZE);
    let offset = origin.to_vec2();

    let area = Rect::from_min_size(origin, egui::vec2(layout.content_width(), grid.viewport_height()));
    painter.rect_filled(area, 0.0, Color32::from(colors.background));

    // Column header: low nibble of the column index
    for column in 0..layout.bytes_per_row {
        painter.text(
            layout.header_anchor(column) + offset,
            Align2::CENTER_CENTER,
            format!("{:X}", column & 0xF),
            font.clone(),
            colors.header_text.into(),
        );
    }

    // Address column
    let scroll_row = grid.scroll_row();
    for row in grid.visible_row_range() {
        painter.text(
            layout.address_anchor(row - scroll_row) + offset,
            Align2::LEFT_CENTER,
            grid.row_label(row),
            font.clone(),
            colors.text.into(),
        );
    }

    for cell in grid.visible_cells() {
        let style = cell_style(cell.record.as_ref(), colors.background);
        let hex_text = cell.record.map(|r| r.hex_text());
        let ascii_text = cell.record.map(|r| r.ascii_char().to_string());

        render_cell(painter, cell.hex_rect.translate(offset), &style, hex_text.as_deref(), &font);
        render_cell(painter, cell.ascii_rect.translate(offset), &style, ascii_text.as_deref(), &font);
    }
}

fn render_cell(painter: &egui::Painter, rect: Rect, style: &CellStyle, text: Option<&str>, font: &FontId) {
    if let Some(fill) = style.fill {
        painter.rect_filled(rect, 0.0, fill);
    }

    if let Some(text) = text {
        painter.text(rect.center(), Align2::CENTER_CENTER, text, font.clone(), style.text);
    }

    if style.separator {
        painter.line_segment(
            [rect.left_top() + egui::vec2(0.0, 1.0), rect.left_bottom()],
            Stroke::new(1.0, style.text),
        );
    }

    painter.line_segment(
        [rect.left_bottom() - egui::vec2(0.0, 0.5), rect.right_bottom() - egui::vec2(0.0, 0.5)],
        Stroke::new(1.0, style.baseline),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(color: u32, is_value_start: bool) -> AccessRecord {
        AccessRecord {
            offset: 0,
            instruction_pointer: 0x401000,
            row_index: 0,
            row_id: 0,
            byte_value: 0x41,
            access_count: 1,
            color: Rgb::new(color),
            is_value_start,
        }
    }

    #[test]
    fn test_dark_fill_gets_white_text() {
        let style = cell_style(Some(&record(0x2C3E50, true)), Rgb::WHITE);
        assert_eq!(style.fill, Some(Color32::from_rgb(0x2C, 0x3E, 0x50)));
        assert_eq!(style.text, Color32::WHITE);
        assert_eq!(style.baseline, Color32::WHITE);
        assert!(style.separator);
    }

    #[test]
    fn test_light_fill_gets_black_text() {
        let style = cell_style(Some(&record(0xF1C40F, false)), Rgb::WHITE);
        assert_eq!(style.text, Color32::BLACK);
        assert!(!style.separator);
    }

    #[test]
    fn test_empty_cell_uses_background_contrast() {
        let style = cell_style(None, Rgb::WHITE);
        assert_eq!(style.fill, None);
        assert_eq!(style.baseline, Color32::BLACK);
        assert!(!style.separator);
    }
}
