//! AnkiConnect HTTP client
//!
//! Every call is a JSON POST of `{action, version, params}`; responses carry
//! a `{result, error}` envelope.

use std::collections::HashMap;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::constants::{anki, http};

use super::types::{CardId, CardInfo, DeckId, DeckStats};

/// AnkiConnect client error
#[derive(Debug, Error)]
pub enum AnkiError {
    /// Transport-level failure (daemon not running, timeout, bad JSON)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// AnkiConnect reported an error in its response envelope
    #[error("anki-connect error: {0}")]
    Api(String),

    /// Envelope contained neither a result nor an error
    #[error("anki-connect returned no result")]
    MissingResult,
}

#[derive(Serialize)]
struct Request<'a> {
    action: &'a str,
    version: u32,
    params: serde_json::Value,
}

#[derive(Deserialize)]
struct Response<T> {
    result: Option<T>,
    error: Option<String>,
}

/// Typed client over the local AnkiConnect HTTP API
#[derive(Debug, Clone)]
pub struct AnkiClient {
    http: Client,
    endpoint: String,
}

impl AnkiClient {
    /// Create a client for the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        let http = Client::builder()
            .connect_timeout(http::CONNECT_TIMEOUT)
            .timeout(http::REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    /// Create a client for the default local endpoint
    pub fn local() -> Self {
        Self::new(anki::DEFAULT_ENDPOINT)
    }

    /// Issue one AnkiConnect action and unwrap the response envelope
    async fn invoke<T: DeserializeOwned>(
        &self,
        action: &str,
        params: serde_json::Value,
    ) -> Result<T, AnkiError> {
        debug!(action, "AnkiConnect request");

        let response: Response<T> = self
            .http
            .post(&self.endpoint)
            .json(&Request {
                action,
                version: anki::PROTOCOL_VERSION,
                params,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(AnkiError::Api(error));
        }
        response.result.ok_or(AnkiError::MissingResult)
    }

    /// List all decks as a name -> id mapping
    pub async fn deck_names_and_ids(&self) -> Result<HashMap<String, DeckId>, AnkiError> {
        self.invoke("deckNamesAndIds", json!({})).await
    }

    /// Fetch statistics for the given decks, keyed by deck id.
    /// The wire format keys the mapping by stringified id.
    pub async fn get_deck_stats(
        &self,
        ids: &[DeckId],
    ) -> Result<HashMap<DeckId, DeckStats>, AnkiError> {
        let raw: HashMap<String, DeckStats> =
            self.invoke("getDeckStats", json!({ "decks": ids })).await?;

        Ok(raw
            .into_iter()
            .filter_map(|(key, stats)| key.parse::<DeckId>().ok().map(|id| (id, stats)))
            .collect())
    }

    /// Find card ids matching an Anki search query
    pub async fn find_cards(&self, query: &str) -> Result<Vec<CardId>, AnkiError> {
        self.invoke("findCards", json!({ "query": query })).await
    }

    /// Fetch full card records for the given ids
    pub async fn cards_info(&self, ids: &[CardId]) -> Result<Vec<CardInfo>, AnkiError> {
        self.invoke("cardsInfo", json!({ "cards": ids })).await
    }
}
