//! Scroll-virtualized hex/ASCII grid.
//!
//! Geometry lives in [`layout`], scroll/pointer state and hit-testing in
//! [`view`]. Painting is done by the GUI on top of [`GridView::visible_cells`].

pub mod layout;
pub mod view;

pub use layout::{GridLayout, Pane};
pub use view::{CursorKind, GridEvent, GridView, VisibleCell};
