//! Persistence layer
//!
//! SQLite-based storage for:
//! - Panel geometry (position + size)
//! - Panel colors
//! - Target deck selection

use std::time::{SystemTime, UNIX_EPOCH};

mod database;
mod panel_state;

#[cfg(test)]
mod database_tests;

pub use database::Database;
pub use panel_state::{
    PanelGeometry, PanelPosition, PanelSize, PanelStore, PanelTheme, StateDecodeError,
};

/// Get current Unix timestamp in seconds
#[inline]
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
