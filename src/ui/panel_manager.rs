//! Panel orchestration and layout management.
//!
//! Lays out the status bar and the hex grid, and collects the interactions
//! that the application coordinator has to handle.

use crate::app::AppState;
use crate::ui::context_menu::{self, ContextMenuAction};
use crate::ui::{hex_panel, status_bar};
use egui::Color32;
use rmemviz::GridEvent;

/// Result of panel interactions that need to be handled by the application coordinator.
pub enum PanelInteraction {
    /// The grid raised an event; `pointer` is the screen position at the time
    Grid {
        event: GridEvent,
        pointer: Option<egui::Pos2>,
    },
    /// An entry of the cell context menu was chosen
    ContextMenu(ContextMenuAction),
}

/// Manages the layout and rendering of all UI panels.
pub struct PanelManager;

impl PanelManager {
    /// Renders all panels in the application window.
    ///
    /// Called from the eframe::App::update() implementation.
    pub fn render_all_panels(ctx: &egui::Context, state: &mut AppState) -> Vec<PanelInteraction> {
        let mut interactions = Vec::new();

        // Status panel at the very bottom
        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            status_bar::render_status_bar(ui, state);
        });

        // Grid fills the rest of the window
        let grid_frame = egui::Frame::default()
            .inner_margin(egui::Margin::same(0))
            .fill(Color32::from(state.colors.background));

        egui::CentralPanel::default()
            .frame(grid_frame)
            .show(ctx, |ui| {
                for panel_event in hex_panel::render_hex_panel(ui, state) {
                    interactions.push(PanelInteraction::Grid {
                        event: panel_event.event,
                        pointer: panel_event.pointer,
                    });
                }
            });

        // Context menu floats above everything else
        if let Some(action) = context_menu::render_context_menu(ctx, &mut state.interaction) {
            interactions.push(PanelInteraction::ContextMenu(action));
        }

        interactions
    }
}
