//! Rendering subsystem for the memory viewer
//!
//! - Grid rendering (header, address column, hex and ASCII cells)
//! - Scrollbar rendering and dragging

pub mod grid_renderer;
pub mod scrollbar_renderer;
