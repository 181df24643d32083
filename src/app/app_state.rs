//! Centralized application state for the memory viewer.
//!
//! Composes the grid model from the library with the focused UI state
//! components from `crate::state`.

use crate::state::{InspectionState, InteractionState};
use rmemviz::{AggregationStats, GridColors, GridLayout, GridView, Session, VisualizerOptions};

pub struct AppState {
    /// Window title
    pub title: String,
    /// Options the session was built with
    pub options: VisualizerOptions,
    pub stats: AggregationStats,

    /// Scroll/hit-test model over the aggregated records
    pub grid: GridView,
    pub colors: GridColors,

    /// Context menu, wheel and drag state
    pub interaction: InteractionState,
    /// Hovered record and last navigation
    pub inspection: InspectionState,

    /// Message shown in the status bar when the window has nothing to draw
    pub notice: Option<String>,
}

impl AppState {
    /// Builds the viewer state for an aggregated session.
    ///
    /// # Arguments
    /// * `session` - Result of a plugin invocation
    /// * `bytes_per_row` - Grid width in bytes
    pub fn from_session(session: Session, bytes_per_row: usize) -> Self {
        let Session { title, options, records, stats } = session;
        let notice = records.is_empty().then(|| {
            format!(
                "No accesses inside {:#x}..={:#x}",
                options.base_address,
                options.base_address.saturating_add(options.window_size)
            )
        });
        Self {
            title,
            options,
            stats,
            grid: GridView::new(GridLayout::with_bytes_per_row(bytes_per_row), records),
            colors: GridColors::default(),
            interaction: InteractionState::new(),
            inspection: InspectionState::new(),
            notice,
        }
    }

    /// Inclusive address range covered by the window.
    pub fn window_range(&self) -> (u64, u64) {
        let base = self.options.base_address;
        (base, base.saturating_add(self.options.window_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmemviz::AccessMap;

    fn session(records: AccessMap) -> Session {
        Session {
            title: "Data visualizer".to_string(),
            options: VisualizerOptions { base_address: 0x1000, window_size: 0x20, ..Default::default() },
            records,
            stats: AggregationStats::default(),
        }
    }

    #[test]
    fn test_empty_window_sets_notice() {
        let state = AppState::from_session(session(AccessMap::new()), 16);
        assert_eq!(state.notice.as_deref(), Some("No accesses inside 0x1000..=0x1020"));
        assert_eq!(state.window_range(), (0x1000, 0x1020));
        assert_eq!(state.grid.total_rows(), 0);
    }

    #[test]
    fn test_bytes_per_row_applied() {
        let state = AppState::from_session(session(AccessMap::new()), 8);
        assert_eq!(state.grid.layout().bytes_per_row, 8);
    }
}
