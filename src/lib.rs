pub mod trace;
pub mod options;
pub mod error;
pub mod color;
pub mod palette;
pub mod record;
pub mod aggregator;
pub mod host;
pub mod plugin;
pub mod grid;
pub mod trace_file;
pub mod writer;

// Export trace model
pub use trace::{AccessKind, MemoryAccess, RowId, TraceEvent};

// Export options and errors
pub use options::{
    option_fields, parse_address, AccessFilter, ByteOrder, FieldKind, FirstAccessPolicy,
    OptionField, OptionValue, TraceSource, VisualizerOptions, DIALOG_TITLE,
};
pub use error::VisualizerError;

// Export aggregation
pub use aggregator::{
    aggregate, infer_width, value_to_bytes, Aggregation, AggregationParams, AggregationStats,
    Aggregator, UnknownWidthPolicy,
};
pub use color::{GridColors, Rgb};
pub use palette::{ColorAllocator, PALETTE};
pub use record::{AccessMap, AccessRecord};

// Export host collaborator and plugin entry point
pub use host::HostApi;
pub use plugin::{execute, Session};

// Export grid view
pub use grid::{CursorKind, GridEvent, GridLayout, GridView, Pane, VisibleCell};

// Export trace file I/O
pub use trace_file::{parse_trace, read_trace_file, TraceFile};
pub use writer::TraceWriter;
