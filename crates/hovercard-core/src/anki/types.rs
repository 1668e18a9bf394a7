//! AnkiConnect data types

use serde::Deserialize;

/// Deck identifier as assigned by Anki
pub type DeckId = i64;

/// Card identifier as assigned by Anki
pub type CardId = i64;

/// Per-deck review statistics from `getDeckStats`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeckStats {
    pub deck_id: DeckId,
    pub name: String,
    pub new_count: u32,
    pub learn_count: u32,
    pub review_count: u32,
    pub total_in_deck: u32,
}

/// A deck with its statistics, assembled from `deckNamesAndIds` +
/// `getDeckStats`. Never mutated locally; identity is `id`.
#[derive(Debug, Clone)]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
    pub stats: DeckStats,
}

/// Card record from `cardsInfo`. Question/answer are rendered HTML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardInfo {
    pub card_id: CardId,
    pub deck_name: String,
    pub model_name: String,
    pub question: String,
    pub answer: String,
    pub due: i64,
    pub interval: i64,
}
