//! Error taxonomy for a visualizer invocation.
//!
//! Library code returns these typed errors; the binaries wrap them in
//! `anyhow` for reporting.

use thiserror::Error;

/// Errors that can occur while preparing a visualization session
#[derive(Error, Debug)]
pub enum VisualizerError {
    /// The options dialog was dismissed
    #[error("cancelled by user")]
    UserCancelled,

    /// The selected trace source yielded no events
    #[error("no data to visualize: the selected trace is empty")]
    EmptyTrace,

    /// A value does not fit the width inferred for its instruction
    #[error("value {value:#x} at row {row_index} does not fit in {width} byte(s)")]
    ByteConversion {
        row_index: usize,
        value: u64,
        width: usize,
    },

    /// The memory address typed by the user is malformed
    #[error("invalid memory address: {0}")]
    AddressParse(#[from] std::num::ParseIntError),

    /// The host returned a form that does not match the requested fields
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl VisualizerError {
    /// Returns true for failures that should end the invocation without a diagnostic.
    pub fn is_silent(&self) -> bool {
        matches!(self, VisualizerError::UserCancelled)
    }
}
