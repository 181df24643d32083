//! Hex grid panel
//!
//! Feeds wheel, keyboard and pointer input to the grid model and paints it.

use eframe::egui;
use egui::{PointerButton, Pos2, Sense};
use rmemviz::{CursorKind, GridEvent};

use crate::app::AppState;
use crate::rendering::{grid_renderer, scrollbar_renderer};

/// An event raised by the grid together with the screen position of the pointer.
pub struct HexPanelEvent {
    pub event: GridEvent,
    pub pointer: Option<Pos2>,
}

/// Renders the hex grid panel.
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Mutable application state (grid, interaction)
///
/// # Returns
/// * Grid events raised this frame, hover first
pub fn render_hex_panel(ui: &mut egui::Ui, state: &mut AppState) -> Vec<HexPanelEvent> {
    let mut events = Vec::new();

    let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
    let content_width = state.grid.layout().content_width();
    let grid_rect = egui::Rect::from_min_size(rect.min, egui::vec2(content_width, rect.height()));
    let track = egui::Rect::from_min_size(
        egui::pos2(grid_rect.right(), rect.top()),
        egui::vec2(scrollbar_renderer::SCROLLBAR_WIDTH, rect.height()),
    );

    state.grid.set_viewport_height(grid_rect.height());

    // Wheel and keyboard scrolling
    if response.hovered() {
        let delta_y = ui.input(|i| i.smooth_scroll_delta.y);
        if delta_y != 0.0 {
            let rows = state.interaction.accumulate_wheel_rows(-delta_y / state.grid.layout().row_height);
            state.grid.scroll_by_rows(rows);
        }
    }
    let (page_down, page_up) = ui.input(|i| (i.key_pressed(egui::Key::PageDown), i.key_pressed(egui::Key::PageUp)));
    if page_down {
        state.grid.page_down();
    }
    if page_up {
        state.grid.page_up();
    }

    let dragging = scrollbar_renderer::render_scrollbar(ui, track, &mut state.grid, &state.colors);

    // Pointer position relative to the grid origin
    let to_grid = |p: Pos2| (p - grid_rect.min).to_pos2();
    let menu_open = state.interaction.is_context_menu_open();

    let hover_pos = if menu_open || dragging {
        None
    } else {
        ui.input(|i| i.pointer.hover_pos()).filter(|p| grid_rect.contains(*p))
    };
    if let Some(event) = state.grid.pointer_moved(hover_pos.map(to_grid)) {
        events.push(HexPanelEvent { event, pointer: hover_pos });
    }

    if !menu_open && !dragging {
        for button in [PointerButton::Primary, PointerButton::Secondary] {
            let released_at = ui.input(|i| {
                if i.pointer.button_released(button) {
                    i.pointer.interact_pos()
                } else {
                    None
                }
            });
            if let Some(pos) = released_at.filter(|p| grid_rect.contains(*p)) {
                if let Some(event) = state.grid.pointer_released(to_grid(pos), button) {
                    events.push(HexPanelEvent { event, pointer: Some(pos) });
                }
            }
        }
    }

    if state.grid.cursor() == CursorKind::Pointing {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }

    grid_renderer::render_grid(&ui.painter_at(grid_rect), grid_rect.min, &state.grid, &state.colors);

    events
}
