//! AnkiConnect integration
//!
//! Thin typed client over the local AnkiConnect HTTP API, plus the search
//! query builder used for card refetches.

mod client;
mod query;
mod types;

pub use client::{AnkiClient, AnkiError};
pub use query::deck_search_query;
pub use types::{CardId, CardInfo, Deck, DeckId, DeckStats};
