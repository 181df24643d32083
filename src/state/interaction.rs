//! Mouse and keyboard interaction state.
//!
//! Tracks state that spans several frames: the open context menu and
//! fractional wheel scrolling.

use rmemviz::AccessRecord;

/// Context menu opened by a secondary click on a populated cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextMenu {
    /// Record the menu acts on
    pub record: AccessRecord,
    /// Screen position where the menu is anchored
    pub anchor: egui::Pos2,
}

/// State related to ongoing mouse/keyboard interactions.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    context_menu: Option<ContextMenu>,
    /// Wheel movement not yet turned into whole rows
    wheel_remainder: f32,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Context Menu =====

    pub fn context_menu(&self) -> Option<ContextMenu> {
        self.context_menu
    }

    pub fn is_context_menu_open(&self) -> bool {
        self.context_menu.is_some()
    }

    pub fn open_context_menu(&mut self, record: AccessRecord, anchor: egui::Pos2) {
        self.context_menu = Some(ContextMenu { record, anchor });
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu = None;
    }

    // ===== Wheel Scrolling =====

    /// Accumulates a wheel delta measured in rows and returns the whole rows to scroll.
    ///
    /// # Arguments
    /// * `rows` - Signed distance in rows; positive scrolls towards higher offsets
    pub fn accumulate_wheel_rows(&mut self, rows: f32) -> i64 {
        self.wheel_remainder += rows;
        let whole = self.wheel_remainder.trunc();
        self.wheel_remainder -= whole;
        whole as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmemviz::Rgb;

    fn record() -> AccessRecord {
        AccessRecord {
            offset: 3,
            instruction_pointer: 0x401000,
            row_index: 0,
            row_id: 7,
            byte_value: 0x41,
            access_count: 1,
            color: Rgb::new(0xE74C3C),
            is_value_start: true,
        }
    }

    #[test]
    fn test_context_menu_open_close() {
        let mut state = InteractionState::new();
        assert!(!state.is_context_menu_open());

        state.open_context_menu(record(), egui::pos2(10.0, 20.0));
        let menu = state.context_menu().unwrap();
        assert_eq!(menu.record.row_id, 7);
        assert_eq!(menu.anchor, egui::pos2(10.0, 20.0));

        state.close_context_menu();
        assert!(state.context_menu().is_none());
    }

    #[test]
    fn test_wheel_accumulates_fractions() {
        let mut state = InteractionState::new();
        assert_eq!(state.accumulate_wheel_rows(0.4), 0);
        assert_eq!(state.accumulate_wheel_rows(0.4), 0);
        assert_eq!(state.accumulate_wheel_rows(0.4), 1);
        assert_eq!(state.accumulate_wheel_rows(-2.5), -2);
    }
}
