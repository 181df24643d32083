//! Vertical scrollbar for the hex grid.
//!
//! The grid is virtualized, so egui's `ScrollArea` would need the full content
//! height. Instead the bar maps its thumb directly onto the grid's scroll row.

use eframe::egui;
use egui::{Rect, Sense};
use rmemviz::{GridColors, GridView};

pub const SCROLLBAR_WIDTH: f32 = 12.0;
const MIN_THUMB_HEIGHT: f32 = 20.0;

/// Thumb rectangle for the current scroll position, or `None` when everything fits.
pub fn thumb_rect(track: Rect, grid: &GridView) -> Option<Rect> {
    let max_scroll = grid.max_scroll_row();
    if max_scroll == 0 || grid.total_rows() == 0 {
        return None;
    }

    let visible_fraction = grid.page_step() as f32 / grid.total_rows() as f32;
    let thumb_height = (track.height() * visible_fraction)
        .clamp(MIN_THUMB_HEIGHT.min(track.height()), track.height());
    let travel = track.height() - thumb_height;
    let top = track.top() + travel * grid.scroll_row() as f32 / max_scroll as f32;

    Some(Rect::from_min_size(
        egui::pos2(track.left(), top),
        egui::vec2(track.width(), thumb_height),
    ))
}

/// Scroll row that puts the thumb's center under `pointer_y`.
pub fn scroll_row_for_pointer(track: Rect, thumb_height: f32, pointer_y: f32, grid: &GridView) -> usize {
    let travel = track.height() - thumb_height;
    if travel <= 0.0 {
        return 0;
    }
    let fraction = ((pointer_y - track.top() - thumb_height / 2.0) / travel).clamp(0.0, 1.0);
    (fraction * grid.max_scroll_row() as f32).round() as usize
}

/// Renders the scrollbar and applies clicks/drags to the grid.
///
/// # Arguments
/// * `ui` - The egui UI context
/// * `track` - Screen rectangle of the scrollbar
/// * `grid` - Grid whose scroll row is driven
/// * `colors` - Track and thumb colors
///
/// # Returns
/// * `bool` - Whether the thumb is being dragged
pub fn render_scrollbar(ui: &mut egui::Ui, track: Rect, grid: &mut GridView, colors: &GridColors) -> bool {
    let response = ui.interact(track, ui.id().with("grid_scrollbar"), Sense::click_and_drag());
    let painter = ui.painter_at(track);
    painter.rect_filled(track, 0.0, colors.scrollbar_track);

    let Some(thumb) = thumb_rect(track, grid) else {
        return false;
    };

    if response.dragged() || response.clicked() {
        if let Some(pointer) = response.interact_pointer_pos() {
            let row = scroll_row_for_pointer(track, thumb.height(), pointer.y, grid);
            grid.set_scroll_row(row);
        }
    }

    // Repaint with the position applied this frame
    if let Some(thumb) = thumb_rect(track, grid) {
        painter.rect_filled(thumb.shrink2(egui::vec2(2.0, 0.0)), 3.0, colors.scrollbar_thumb);
    }

    response.dragged()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmemviz::{AccessMap, AccessRecord, GridLayout, Rgb};

    fn grid(last_offset: u64, height: f32) -> GridView {
        let record = AccessRecord {
            offset: last_offset,
            instruction_pointer: 0,
            row_index: 0,
            row_id: 0,
            byte_value: 0,
            access_count: 1,
            color: Rgb::BLACK,
            is_value_start: true,
        };
        let map: AccessMap = std::iter::once(record).collect();
        let mut view = GridView::new(GridLayout::default(), map);
        view.set_viewport_height(height);
        view
    }

    fn track() -> Rect {
        Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(SCROLLBAR_WIDTH, 200.0))
    }

    #[test]
    fn test_no_thumb_when_content_fits() {
        assert!(thumb_rect(track(), &grid(15, 220.0)).is_none());
    }

    #[test]
    fn test_thumb_moves_with_scroll() {
        // 100 rows, 10 per page
        let mut view = grid(1599, 220.0);
        let top = thumb_rect(track(), &view).unwrap();
        assert_eq!(top.top(), 0.0);
        assert_eq!(top.height(), 20.0);

        view.set_scroll_row(view.max_scroll_row());
        let bottom = thumb_rect(track(), &view).unwrap();
        assert_eq!(bottom.bottom(), 200.0);
    }

    #[test]
    fn test_pointer_maps_to_scroll_row() {
        let view = grid(1599, 220.0);
        assert_eq!(scroll_row_for_pointer(track(), 20.0, 0.0, &view), 0);
        assert_eq!(scroll_row_for_pointer(track(), 20.0, 200.0, &view), 90);
        assert_eq!(scroll_row_for_pointer(track(), 20.0, 100.0, &view), 45);
    }
}
