//! Deck synchronization engine
//!
//! Reconciles the user's target deck selection with externally fetched data:
//! loads the deck catalogue, filters it against a debounced search term, and
//! refetches card records whenever the target set changes. Fetches run as
//! background tasks and deliver results over channels drained by `tick`;
//! every card fetch carries a generation number so that under rapid toggling
//! the displayed list always reflects the last-issued request, regardless of
//! arrival order.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::anki::{deck_search_query, AnkiClient, AnkiError, CardInfo, Deck};
use crate::constants::search::DEBOUNCE_WINDOW;
use crate::storage::PanelStore;

mod debounce;

pub use debounce::SearchDebounce;

/// Result of a card refetch, tagged with the generation it was issued under
struct CardFetchOutcome {
    generation: u64,
    result: Result<Vec<CardInfo>, AnkiError>,
}

/// Deck synchronization engine
pub struct DeckSyncEngine {
    client: Arc<AnkiClient>,

    decks: Vec<Deck>,
    loading: bool,

    /// Raw search input, shown in the UI as typed
    search_input: String,
    /// Committed (debounced, lowercased) term actually used for filtering
    committed_term: String,
    debounce: SearchDebounce,

    /// Ordered target deck selection; each name present at most once
    target_decks: Vec<String>,

    /// Cards matching the current target set
    cards: Vec<CardInfo>,

    /// Generation of the most recently issued card fetch
    card_generation: u64,

    deck_rx: Option<oneshot::Receiver<Result<Vec<Deck>, AnkiError>>>,
    deck_task: Option<JoinHandle<()>>,
    cards_tx: mpsc::UnboundedSender<CardFetchOutcome>,
    cards_rx: mpsc::UnboundedReceiver<CardFetchOutcome>,
    card_task: Option<JoinHandle<()>>,
}

impl DeckSyncEngine {
    /// Create an engine. The target selection is rehydrated from storage by
    /// the caller and passed in at construction.
    pub fn new(client: Arc<AnkiClient>, target_decks: Vec<String>) -> Self {
        let (cards_tx, cards_rx) = mpsc::unbounded_channel();
        Self {
            client,
            decks: Vec::new(),
            loading: false,
            search_input: String::new(),
            committed_term: String::new(),
            debounce: SearchDebounce::new(DEBOUNCE_WINDOW),
            target_decks,
            cards: Vec::new(),
            card_generation: 0,
            deck_rx: None,
            deck_task: None,
            cards_tx,
            cards_rx,
            card_task: None,
        }
    }

    /// Kick off the deck catalogue load: names first, then stats keyed by
    /// the resulting ids. `is_loading` stays true until the result lands.
    pub fn begin_load_decks(&mut self) {
        let (tx, rx) = oneshot::channel();
        let client = Arc::clone(&self.client);

        self.loading = true;
        self.deck_rx = Some(rx);
        if let Some(task) = self.deck_task.take() {
            task.abort();
        }
        self.deck_task = Some(tokio::spawn(async move {
            let result = load_deck_catalogue(&client).await;
            let _ = tx.send(result);
        }));
    }

    /// Update the raw search input and re-arm the debounce. The committed
    /// term only changes once the window elapses without further input.
    pub fn update_search(&mut self, input: &str, now: Instant) {
        self.search_input = input.to_string();
        self.debounce.arm(input, now);
    }

    /// Raw search input for display
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Committed filter term
    pub fn committed_term(&self) -> &str {
        &self.committed_term
    }

    /// Whether the catalogue load is still in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Full deck catalogue
    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    /// Decks matching the committed term (case-insensitive substring on the
    /// deck name)
    pub fn filtered_decks(&self) -> Vec<&Deck> {
        if self.committed_term.is_empty() {
            return self.decks.iter().collect();
        }
        self.decks
            .iter()
            .filter(|deck| deck.name.to_lowercase().contains(&self.committed_term))
            .collect()
    }

    /// Current target selection, in toggle order
    pub fn target_decks(&self) -> &[String] {
        &self.target_decks
    }

    /// Whether a deck is currently selected for study
    pub fn is_target(&self, name: &str) -> bool {
        self.target_decks.iter().any(|deck| deck == name)
    }

    /// Cards for the current target selection
    pub fn cards(&self) -> &[CardInfo] {
        &self.cards
    }

    /// Flip a deck's membership in the target set, persist the selection,
    /// and refetch cards for the new set.
    pub fn toggle_deck(&mut self, name: &str, store: &PanelStore) {
        if let Some(index) = self.target_decks.iter().position(|deck| deck == name) {
            self.target_decks.remove(index);
        } else {
            self.target_decks.push(name.to_string());
        }

        if let Err(e) = store.save_target_decks(&self.target_decks) {
            warn!(error = %e, "Failed to persist target decks");
        }

        self.refetch_cards();
    }

    /// Issue a card fetch for the current target set. Supersedes any fetch
    /// still in flight: the older task is aborted and its generation can no
    /// longer win.
    fn refetch_cards(&mut self) {
        let generation = self.next_card_generation();

        if let Some(task) = self.card_task.take() {
            task.abort();
        }

        if self.target_decks.is_empty() {
            self.cards.clear();
            return;
        }

        let query = deck_search_query(&self.target_decks);
        let client = Arc::clone(&self.client);
        let tx = self.cards_tx.clone();

        self.card_task = Some(tokio::spawn(async move {
            let result = fetch_cards(&client, &query).await;
            let _ = tx.send(CardFetchOutcome { generation, result });
        }));
    }

    /// Advance and return the card fetch generation
    pub(crate) fn next_card_generation(&mut self) -> u64 {
        self.card_generation += 1;
        self.card_generation
    }

    /// Apply a card fetch result. Stale generations are discarded so the
    /// displayed list always matches the last-issued request; failures keep
    /// the previous list and return a notice for the user.
    pub(crate) fn apply_card_outcome(
        &mut self,
        generation: u64,
        result: Result<Vec<CardInfo>, AnkiError>,
    ) -> Option<String> {
        if generation != self.card_generation {
            debug!(
                generation,
                latest = self.card_generation,
                "Discarding stale card fetch"
            );
            return None;
        }

        match result {
            Ok(cards) => {
                info!(count = cards.len(), "Card list updated");
                self.cards = cards;
                None
            }
            Err(e) => Some(format!("Card fetch failed: {}", e)),
        }
    }

    /// Apply the deck catalogue result. Failure leaves the list empty and
    /// returns a notice.
    pub(crate) fn apply_deck_catalogue(
        &mut self,
        result: Result<Vec<Deck>, AnkiError>,
    ) -> Option<String> {
        self.loading = false;
        match result {
            Ok(decks) => {
                info!(count = decks.len(), "Deck catalogue loaded");
                self.decks = decks;
                None
            }
            Err(e) => Some(format!("Deck load failed: {}", e)),
        }
    }

    /// Drive time-based and channel-based updates. Called from the UI tick.
    /// Returns user-facing notices (fetch failures) for the toast queue.
    pub fn tick(&mut self, now: Instant) -> Vec<String> {
        let mut notices = Vec::new();

        if let Some(term) = self.debounce.poll(now) {
            self.committed_term = term;
        }

        if let Some(rx) = &mut self.deck_rx {
            match rx.try_recv() {
                Ok(result) => {
                    self.deck_rx = None;
                    self.deck_task = None;
                    notices.extend(self.apply_deck_catalogue(result));
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    self.deck_rx = None;
                    self.loading = false;
                }
            }
        }

        while let Ok(outcome) = self.cards_rx.try_recv() {
            notices.extend(self.apply_card_outcome(outcome.generation, outcome.result));
        }

        notices
    }

    /// Abort in-flight fetches and drop any pending debounce commit.
    /// Called on teardown; hiding the panel does not go through here, so
    /// fetches started before a hide complete (or are discarded) normally.
    pub fn shutdown(&mut self) {
        self.debounce.cancel();
        if let Some(task) = self.deck_task.take() {
            task.abort();
        }
        if let Some(task) = self.card_task.take() {
            task.abort();
        }
        self.deck_rx = None;
    }
}

impl Drop for DeckSyncEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Two dependent calls: names first, then stats keyed by the resulting ids
async fn load_deck_catalogue(client: &AnkiClient) -> Result<Vec<Deck>, AnkiError> {
    let names_to_ids = client.deck_names_and_ids().await?;
    let ids: Vec<_> = names_to_ids.values().copied().collect();
    let mut stats = client.get_deck_stats(&ids).await?;

    let mut decks: Vec<Deck> = names_to_ids
        .into_iter()
        .map(|(name, id)| {
            let stats = stats.remove(&id).unwrap_or_default();
            Deck { id, name, stats }
        })
        .collect();
    decks.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(decks)
}

/// Find matching card ids, then fetch their full records
async fn fetch_cards(client: &AnkiClient, query: &str) -> Result<Vec<CardInfo>, AnkiError> {
    let ids = client.find_cards(query).await?;
    client.cards_info(&ids).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anki::{DeckId, DeckStats};
    use crate::storage::{Database, PanelStore};

    fn test_engine() -> DeckSyncEngine {
        // Nothing listens on this port; spawned fetches fail fast and their
        // outcomes are ignored by the generation-sensitive assertions below
        DeckSyncEngine::new(Arc::new(AnkiClient::new("http://127.0.0.1:9")), Vec::new())
    }

    fn test_store() -> PanelStore {
        PanelStore::new(Database::in_memory().expect("Failed to create database"))
    }

    fn deck(name: &str, id: DeckId) -> Deck {
        Deck {
            id,
            name: name.to_string(),
            stats: DeckStats::default(),
        }
    }

    #[tokio::test]
    async fn test_toggle_parity() {
        let mut engine = test_engine();
        let store = test_store();

        for round in 1..=4 {
            engine.toggle_deck("Japanese::N5", &store);
            let expect_member = round % 2 == 1;
            assert_eq!(engine.is_target("Japanese::N5"), expect_member);
        }
    }

    #[tokio::test]
    async fn test_toggle_keeps_order_and_uniqueness() {
        let mut engine = test_engine();
        let store = test_store();

        engine.toggle_deck("B", &store);
        engine.toggle_deck("A", &store);
        engine.toggle_deck("C", &store);
        engine.toggle_deck("A", &store);
        engine.toggle_deck("A", &store);

        assert_eq!(engine.target_decks(), &["B", "C", "A"]);
    }

    #[tokio::test]
    async fn test_toggle_persists_selection() {
        let mut engine = test_engine();
        let store = test_store();

        engine.toggle_deck("Spanish", &store);
        engine.toggle_deck("French", &store);

        assert_eq!(store.load_target_decks(), vec!["Spanish", "French"]);
    }

    #[test]
    fn test_stale_card_fetch_discarded() {
        let mut engine = DeckSyncEngine::new(Arc::new(AnkiClient::local()), Vec::new());

        let first = engine.next_card_generation();
        let second = engine.next_card_generation();

        // Later-issued fetch resolves first
        assert!(engine
            .apply_card_outcome(second, Ok(vec![CardInfo::default()]))
            .is_none());
        assert_eq!(engine.cards().len(), 1);

        // Earlier fetch arriving late must not overwrite the newer result
        assert!(engine
            .apply_card_outcome(first, Ok(vec![CardInfo::default(), CardInfo::default()]))
            .is_none());
        assert_eq!(engine.cards().len(), 1);
    }

    #[test]
    fn test_card_fetch_failure_keeps_previous_list() {
        let mut engine = DeckSyncEngine::new(Arc::new(AnkiClient::local()), Vec::new());

        let generation = engine.next_card_generation();
        assert!(engine
            .apply_card_outcome(generation, Ok(vec![CardInfo::default()]))
            .is_none());

        let generation = engine.next_card_generation();
        let notice = engine.apply_card_outcome(generation, Err(AnkiError::Api("boom".into())));

        assert!(notice.is_some());
        assert_eq!(engine.cards().len(), 1, "previous list must survive");
    }

    #[test]
    fn test_deck_load_failure_leaves_list_empty() {
        let mut engine = DeckSyncEngine::new(Arc::new(AnkiClient::local()), Vec::new());
        engine.loading = true;

        let notice = engine.apply_deck_catalogue(Err(AnkiError::Api("no anki".into())));

        assert!(notice.is_some());
        assert!(engine.decks().is_empty());
        assert!(!engine.is_loading());
    }

    #[test]
    fn test_filtering_is_case_insensitive_substring() {
        let mut engine = DeckSyncEngine::new(Arc::new(AnkiClient::local()), Vec::new());
        assert!(engine
            .apply_deck_catalogue(Ok(vec![
                deck("Japanese::N5", 1),
                deck("Japanese::N4", 2),
                deck("Spanish", 3),
            ]))
            .is_none());

        engine.committed_term = "japanese".to_string();
        let names: Vec<_> = engine.filtered_decks().iter().map(|d| &d.name).collect();
        assert_eq!(names, ["Japanese::N4", "Japanese::N5"]);

        engine.committed_term = String::new();
        assert_eq!(engine.filtered_decks().len(), 3);
    }

    #[test]
    fn test_search_commit_goes_through_debounce() {
        let mut engine = DeckSyncEngine::new(Arc::new(AnkiClient::local()), Vec::new());
        let start = Instant::now();

        engine.update_search("a", start);
        engine.update_search("ab", start + DEBOUNCE_WINDOW / 3);
        engine.update_search("aB", start + DEBOUNCE_WINDOW / 2);

        assert_eq!(engine.search_input(), "aB");
        assert_eq!(engine.committed_term(), "");

        // tick before the deadline: no commit yet
        let notices = engine.tick(start + DEBOUNCE_WINDOW / 2);
        assert!(notices.is_empty());
        assert_eq!(engine.committed_term(), "");

        // tick after the (re-armed) deadline: exactly one commit, lowercased
        engine.tick(start + DEBOUNCE_WINDOW * 2);
        assert_eq!(engine.committed_term(), "ab");
    }

    #[tokio::test]
    async fn test_clearing_targets_clears_cards_without_fetch() {
        let mut engine = test_engine();
        let store = test_store();

        let generation = engine.next_card_generation();
        assert!(engine
            .apply_card_outcome(generation, Ok(vec![CardInfo::default()]))
            .is_none());

        engine.toggle_deck("Only", &store);
        engine.toggle_deck("Only", &store);

        assert!(engine.target_decks().is_empty());
        assert!(engine.cards().is_empty());
    }
}
