//! Host backed by a trace file on disk.
//!
//! The viewer runs outside a debugger, so the "host" is the loaded trace plus
//! option answers taken from the command line. Navigation requests are logged
//! and resolved against the trace so the status bar can show the row.

use log::{debug, info};
use rmemviz::{HostApi, OptionField, OptionValue, RowId, TraceEvent, TraceFile};

pub struct FileHost {
    trace: TraceFile,
    /// Answers returned for the options form; `None` behaves like a cancelled dialog
    answers: Option<Vec<OptionValue>>,
    navigation_history: Vec<RowId>,
}

impl FileHost {
    /// # Arguments
    /// * `trace` - The loaded trace file
    /// * `answers` - Preset option values, in form order
    pub fn new(trace: TraceFile, answers: Option<Vec<OptionValue>>) -> Self {
        Self {
            trace,
            answers,
            navigation_history: Vec::new(),
        }
    }

    /// Rows the viewer asked to navigate to, oldest first.
    #[cfg(test)]
    pub fn navigation_history(&self) -> &[RowId] {
        &self.navigation_history
    }

    /// One-line description of a trace row, e.g. `0x401000  push rbp`.
    pub fn describe_row(&self, row_id: RowId) -> Option<String> {
        self.trace
            .full_trace()
            .iter()
            .find(|event| event.row_id == row_id)
            .map(|event| format!("{:#x}  {}", event.instruction_pointer, event.disassembly_text))
    }
}

impl HostApi for FileHost {
    fn prompt_user_for_options(&mut self, title: &str, fields: &[OptionField]) -> Option<Vec<OptionValue>> {
        debug!("{}: answering {} option fields from the command line", title, fields.len());
        self.answers.clone()
    }

    fn get_full_trace(&self) -> Vec<TraceEvent> {
        self.trace.full_trace().to_vec()
    }

    fn get_filtered_trace(&self) -> Vec<TraceEvent> {
        self.trace.filtered_trace()
    }

    fn get_pointer_size(&self) -> i64 {
        self.trace.pointer_size
    }

    fn navigate_to_row(&mut self, row_id: RowId) {
        match self.describe_row(row_id) {
            Some(text) => info!("Go to trace row {}: {}", row_id, text),
            None => info!("Go to trace row {}", row_id),
        }
        self.navigation_history.push(row_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmemviz::{execute, MemoryAccess, VisualizerError};

    fn trace() -> TraceFile {
        TraceFile::from_events(
            8,
            vec![
                TraceEvent::new(0x401000, 0, "pop rbp").with_access(MemoryAccess::read(0x7000, 0x1122)),
                TraceEvent::new(0x401001, 1, "mov rbp, rsp"),
            ],
        )
    }

    fn answers() -> Vec<OptionValue> {
        vec![OptionValue::Text("0x7000".into()), OptionValue::Number(64)]
    }

    #[test]
    fn test_execute_against_file_host() {
        let mut host = FileHost::new(trace(), Some(answers()));
        let session = execute(&mut host, Some(1)).unwrap();
        // pop uses the pointer width: 8 little-endian bytes
        assert_eq!(session.records.len(), 8);
        assert_eq!(session.records.get(0).unwrap().byte_value, 0x22);
        assert_eq!(session.records.get(1).unwrap().byte_value, 0x11);
    }

    #[test]
    fn test_missing_answers_cancel() {
        let mut host = FileHost::new(trace(), None);
        assert!(matches!(execute(&mut host, None), Err(VisualizerError::UserCancelled)));
    }

    #[test]
    fn test_navigation_is_recorded() {
        let mut host = FileHost::new(trace(), Some(answers()));
        host.navigate_to_row(1);
        host.navigate_to_row(42);
        assert_eq!(host.navigation_history(), &[1, 42]);
        assert_eq!(host.describe_row(1).as_deref(), Some("0x401001  mov rbp, rsp"));
        assert_eq!(host.describe_row(42), None);
    }
}
