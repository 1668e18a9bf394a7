//! UI state for the panel

mod drag;

pub use drag::{DragState, PanelTracker};
