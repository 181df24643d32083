//! Services the embedding host application provides to the visualizer.

use crate::options::{OptionField, OptionValue};
use crate::trace::{RowId, TraceEvent};

/// Host-provided collaborator API.
///
/// The visualizer never reaches into the host directly; everything it needs
/// (user input, trace data, navigation) goes through this trait.
pub trait HostApi {
    /// Shows a modal form and returns the entered values, or `None` on cancel.
    fn prompt_user_for_options(&mut self, title: &str, fields: &[OptionField]) -> Option<Vec<OptionValue>>;

    /// Returns the complete trace.
    fn get_full_trace(&self) -> Vec<TraceEvent>;

    /// Returns the trace after the host's own filtering.
    fn get_filtered_trace(&self) -> Vec<TraceEvent>;

    /// Native pointer width of the traced process; may be non-positive if unknown.
    fn get_pointer_size(&self) -> i64;

    /// Scrolls the host's own trace view to `row_id`.
    fn navigate_to_row(&mut self, row_id: RowId);
}
