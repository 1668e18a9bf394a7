//! Hovercard core library
//!
//! Shared building blocks for the floating study panel:
//! - SQLite-backed panel state persistence
//! - AnkiConnect HTTP client
//! - Deck synchronization engine (search, targets, card refetch)

pub mod anki;
pub mod constants;
pub mod paths;
pub mod storage;
pub mod sync;
