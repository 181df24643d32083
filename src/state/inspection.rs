//! What the status bar reports: the last hovered record and the last trace
//! row the host was asked to show.

use rmemviz::{AccessRecord, RowId};

#[derive(Debug, Clone, Default)]
pub struct InspectionState {
    hovered: Option<AccessRecord>,
    navigated_row: Option<RowId>,
    /// Host-provided description of the navigated row
    navigated_text: Option<String>,
}

impl InspectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers the record under the pointer. The status keeps showing it
    /// after the pointer leaves the cell.
    pub fn set_hovered(&mut self, record: AccessRecord) {
        self.hovered = Some(record);
    }

    pub fn set_navigated(&mut self, row_id: RowId, description: Option<String>) {
        self.navigated_row = Some(row_id);
        self.navigated_text = description;
    }

    #[cfg(test)]
    pub fn navigated_row(&self) -> Option<RowId> {
        self.navigated_row
    }

    /// Status line text for the hovered record.
    pub fn status_text(&self) -> String {
        match &self.hovered {
            Some(record) => record.to_string(),
            None => "Hover a byte to inspect it".to_string(),
        }
    }

    /// Status line text for the last navigation, if any.
    pub fn navigation_text(&self) -> Option<String> {
        let row = self.navigated_row?;
        Some(match &self.navigated_text {
            Some(text) => format!("Trace row {}: {}", row, text),
            None => format!("Trace row {}", row),
        })
    }
}
