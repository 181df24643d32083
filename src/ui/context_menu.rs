//! Context menu for a grid cell.

use eframe::egui;
use rmemviz::AccessRecord;

use crate::state::InteractionState;

/// Action chosen from the context menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContextMenuAction {
    /// Copy the record's text form to the clipboard
    CopyToClipboard(AccessRecord),
    /// Ask the host to show the record's trace row
    GoToTrace(AccessRecord),
}

/// Renders the open context menu, if any.
///
/// The menu closes when an entry is chosen, on Escape, or on a click
/// anywhere outside it.
pub fn render_context_menu(ctx: &egui::Context, interaction: &mut InteractionState) -> Option<ContextMenuAction> {
    let menu = interaction.context_menu()?;
    let mut action = None;

    let area = egui::Area::new(egui::Id::new("grid_context_menu"))
        .order(egui::Order::Foreground)
        .fixed_pos(menu.anchor)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_min_width(140.0);
                if ui.button("Copy to clipboard").clicked() {
                    action = Some(ContextMenuAction::CopyToClipboard(menu.record));
                }
                if ui.button("Go to trace row").clicked() {
                    action = Some(ContextMenuAction::GoToTrace(menu.record));
                }
            });
        });

    let escape = ctx.input(|i| i.key_pressed(egui::Key::Escape));
    if action.is_some() || escape || area.response.clicked_elsewhere() {
        interaction.close_context_menu();
    }

    action
}
