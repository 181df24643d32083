//! Application-level coordination.
//!
//! Turns grid and context-menu interactions into state changes and host calls.

use crate::app::AppState;
use crate::ui::context_menu::ContextMenuAction;
use log::debug;
use crate::io::FileHost;
use rmemviz::{AccessRecord, GridEvent, HostApi};

pub struct ApplicationCoordinator;

impl ApplicationCoordinator {
    /// Reacts to one event raised by the grid.
    ///
    /// # Arguments
    /// * `state` - Application state
    /// * `host` - Host receiving navigation requests
    /// * `event` - Event raised by the grid
    /// * `pointer` - Screen position of the pointer when the event fired
    pub fn handle_grid_event(
        state: &mut AppState,
        host: &mut FileHost,
        event: GridEvent,
        pointer: Option<egui::Pos2>,
    ) {
        match event {
            GridEvent::Hover(record) => {
                state.inspection.set_hovered(record);
            }
            GridEvent::PrimaryActivate(record) => {
                Self::navigate(state, host, &record);
            }
            GridEvent::SecondaryActivate(record) => {
                if let Some(anchor) = pointer {
                    state.interaction.open_context_menu(record, anchor);
                }
            }
        }
    }

    /// Runs the action chosen from the context menu.
    pub fn handle_context_menu_action(
        state: &mut AppState,
        host: &mut FileHost,
        action: ContextMenuAction,
        ctx: &egui::Context,
    ) {
        match action {
            ContextMenuAction::CopyToClipboard(record) => {
                let text = record.to_string();
                debug!("Copying to clipboard: {}", text);
                ctx.copy_text(text);
            }
            ContextMenuAction::GoToTrace(record) => {
                Self::navigate(state, host, &record);
            }
        }
    }

    fn navigate(state: &mut AppState, host: &mut FileHost, record: &AccessRecord) {
        host.navigate_to_row(record.row_id);
        state.inspection.set_navigated(record.row_id, host.describe_row(record.row_id));
    }
}
