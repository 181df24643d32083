//! Status bar UI rendering
//!
//! Shows the hovered record, the last navigated trace row and a summary of
//! the aggregation.

use eframe::egui;
use egui::RichText;
use crate::app::AppState;

/// Summary of the aggregated window, e.g. `0x1000..=0x17d0 | 96 bytes | 4 instructions`.
pub fn summary_text(state: &AppState) -> String {
    let (start, end) = state.window_range();
    format!(
        "{:#x}..={:#x} | {} bytes | {} instructions | {} rows",
        start,
        end,
        state.grid.records().len(),
        state.stats.distinct_instructions,
        state.stats.events,
    )
}

/// Renders the status panel at the bottom of the window
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Reference to application state
pub fn render_status_bar(ui: &mut egui::Ui, state: &AppState) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(state.inspection.status_text()).monospace());
    });

    ui.horizontal(|ui| {
        ui.label(RichText::new(summary_text(state)).strong());

        if let Some(navigation) = state.inspection.navigation_text() {
            ui.label(RichText::new("|").strong());
            ui.label(navigation);
        }

        if let Some(notice) = &state.notice {
            ui.label(RichText::new("|").strong());
            ui.colored_label(egui::Color32::DARK_RED, notice);
        }
    });
}
