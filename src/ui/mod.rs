//! UI panel rendering and input handling.
//!
//! - `panel_manager` - window layout and interaction collection
//! - `hex_panel` - the scrollable hex/ASCII grid
//! - `context_menu` - per-cell context menu
//! - `status_bar` - hovered record and session summary

pub mod panel_manager;
pub mod hex_panel;
pub mod context_menu;
pub mod status_bar;
