//! Plugin entry point: options → trace → aggregated session.

use crate::aggregator::{AggregationParams, AggregationStats, Aggregator};
use crate::error::VisualizerError;
use crate::host::HostApi;
use crate::options::{option_fields, TraceSource, VisualizerOptions, DIALOG_TITLE};
use crate::record::AccessMap;
use log::{debug, error, info};

/// Everything the viewer needs for one invocation.
#[derive(Debug, Clone)]
pub struct Session {
    pub title: String,
    pub options: VisualizerOptions,
    pub records: AccessMap,
    pub stats: AggregationStats,
}

/// Runs one plugin invocation against `host`.
///
/// `color_seed` pins overflow colors; `None` uses entropy. A cancelled dialog
/// yields [`VisualizerError::UserCancelled`], an empty trace
/// [`VisualizerError::EmptyTrace`]; in both cases no aggregation runs.
pub fn execute<H: HostApi + ?Sized>(host: &mut H, color_seed: Option<u64>) -> Result<Session, VisualizerError> {
    let values = match host.prompt_user_for_options(DIALOG_TITLE, &option_fields()) {
        Some(values) => values,
        None => {
            debug!("Options dialog cancelled");
            return Err(VisualizerError::UserCancelled);
        }
    };
    let options = VisualizerOptions::from_values(&values)?;
    debug!("Visualizer options: {:?}", options);

    let trace = match options.source {
        TraceSource::Full => host.get_full_trace(),
        TraceSource::Filtered => host.get_filtered_trace(),
    };
    if trace.is_empty() {
        error!("Plugin error: empty trace.");
        return Err(VisualizerError::EmptyTrace);
    }

    let mut params = AggregationParams::from_options(&options, host.get_pointer_size());
    params.color_seed = color_seed;

    info!(
        "Visualizing {} bytes at {:#x} from {} trace rows",
        options.window_size,
        options.base_address,
        trace.len()
    );
    let aggregation = Aggregator::new(params).aggregate(&trace)?;

    Ok(Session {
        title: DIALOG_TITLE.to_string(),
        options,
        records: aggregation.records,
        stats: aggregation.stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{OptionField, OptionValue};
    use crate::trace::{MemoryAccess, RowId, TraceEvent};

    struct FakeHost {
        answer: Option<Vec<OptionValue>>,
        full: Vec<TraceEvent>,
        filtered: Vec<TraceEvent>,
        navigated: Vec<RowId>,
    }

    impl FakeHost {
        fn new(answer: Option<Vec<OptionValue>>) -> Self {
            Self {
                answer,
                full: vec![TraceEvent::new(0x1000, 0, "movzx eax, byte ptr [rbx]").with_access(MemoryAccess::read(0x2000, 0xAB))],
                filtered: Vec::new(),
                navigated: Vec::new(),
            }
        }
    }

    impl HostApi for FakeHost {
        fn prompt_user_for_options(&mut self, title: &str, fields: &[OptionField]) -> Option<Vec<OptionValue>> {
            assert_eq!(title, DIALOG_TITLE);
            assert_eq!(fields.len(), 6);
            self.answer.clone()
        }

        fn get_full_trace(&self) -> Vec<TraceEvent> {
            self.full.clone()
        }

        fn get_filtered_trace(&self) -> Vec<TraceEvent> {
            self.filtered.clone()
        }

        fn get_pointer_size(&self) -> i64 {
            8
        }

        fn navigate_to_row(&mut self, row_id: RowId) {
            self.navigated.push(row_id);
        }
    }

    fn answer(source: usize) -> Vec<OptionValue> {
        vec![
            OptionValue::Text("0x2000".into()),
            OptionValue::Number(16),
            OptionValue::Choice(source),
            OptionValue::Choice(0),
        ]
    }

    #[test]
    fn test_cancel_is_silent() {
        let mut host = FakeHost::new(None);
        let err = execute(&mut host, Some(0)).unwrap_err();
        assert!(matches!(err, VisualizerError::UserCancelled));
        assert!(err.is_silent());
    }

    #[test]
    fn test_full_trace_session() {
        let mut host = FakeHost::new(Some(answer(0)));
        let session = execute(&mut host, Some(0)).unwrap();
        assert_eq!(session.records.len(), 1);
        assert_eq!(session.records.get(0).unwrap().byte_value, 0xAB);
        assert_eq!(session.options.base_address, 0x2000);
        assert_eq!(session.title, DIALOG_TITLE);
    }

    #[test]
    fn test_empty_filtered_trace() {
        let mut host = FakeHost::new(Some(answer(1)));
        let err = execute(&mut host, Some(0)).unwrap_err();
        assert!(matches!(err, VisualizerError::EmptyTrace));
        assert!(!err.is_silent());
    }

    #[test]
    fn test_bad_address_propagates() {
        let mut values = answer(0);
        values[0] = OptionValue::Text("0xnope".into());
        let mut host = FakeHost::new(Some(values));
        let err = execute(&mut host, Some(0)).unwrap_err();
        assert!(matches!(err, VisualizerError::AddressParse(_)));
    }
}
