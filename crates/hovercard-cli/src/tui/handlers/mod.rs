//! Event handlers
//!
//! Mouse and keyboard routing for the panel, split out of app.rs.

mod keyboard;
mod mouse;
