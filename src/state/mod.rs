//! State management modules for the memory viewer.
//!
//! This module contains state-only logic (no UI concerns):
//! - Interaction state (context menu, wheel accumulation)
//! - Inspection state (hovered record, last navigated trace row)

mod interaction;
mod inspection;

pub use interaction::InteractionState;
pub use inspection::InspectionState;
