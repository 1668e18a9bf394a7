//! Panel state storage
//!
//! Geometry, colors, and the target deck selection live in the `panel_state`
//! key-value table as independent JSON blobs. Each key is loaded and
//! validated on its own; a corrupt or missing blob falls back to its default
//! without disturbing the others.

use anyhow::Result;
use rusqlite::params;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::panel::{
    DEFAULT_HEIGHT, DEFAULT_POSITION, DEFAULT_WIDTH, MIN_PANEL_HEIGHT, MIN_PANEL_WIDTH,
};
use crate::paths;

use super::{unix_timestamp, Database};

const POSITION_KEY: &str = "panel_position";
const SIZE_KEY: &str = "panel_size";
const COLORS_KEY: &str = "panel_colors";
const TARGET_DECKS_KEY: &str = "target_decks";

/// Why a persisted blob was rejected
#[derive(Debug, Error)]
pub enum StateDecodeError {
    /// Nothing stored under the key
    #[error("key not present")]
    Missing,

    /// Stored value is not valid JSON for the expected shape
    #[error("malformed value: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Parsed fine but failed shape validation
    #[error("invalid shape: {0}")]
    Invalid(&'static str),
}

/// Panel position in terminal cells. May go negative while dragging; the
/// renderer clamps to the visible area, the state does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelPosition {
    pub x: i32,
    pub y: i32,
}

impl Default for PanelPosition {
    fn default() -> Self {
        let (x, y) = DEFAULT_POSITION;
        Self { x, y }
    }
}

/// Panel size in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSize {
    pub width: u16,
    pub height: u16,
}

impl PanelSize {
    /// Clamp both dimensions to the configured minimums
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.max(MIN_PANEL_WIDTH),
            height: self.height.max(MIN_PANEL_HEIGHT),
        }
    }
}

impl Default for PanelSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Position + size of the floating panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelGeometry {
    pub position: PanelPosition,
    pub size: PanelSize,
}

/// Panel color scheme, stored as hex strings (`#RRGGBB`). All four fields
/// must be present for a stored value to be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelTheme {
    pub header_bg: String,
    pub header_text: String,
    pub body_bg: String,
    pub body_text: String,
}

impl Default for PanelTheme {
    fn default() -> Self {
        Self {
            header_bg: "#EF4444".to_string(),
            header_text: "#FFFFFF".to_string(),
            body_bg: "#FFFFFF".to_string(),
            body_text: "#374151".to_string(),
        }
    }
}

impl PanelTheme {
    fn validate(&self) -> Result<(), &'static str> {
        let fields = [
            &self.header_bg,
            &self.header_text,
            &self.body_bg,
            &self.body_text,
        ];
        if fields.iter().any(|f| f.is_empty()) {
            return Err("empty color field");
        }
        Ok(())
    }
}

/// Panel state manager
pub struct PanelStore {
    db: Database,
}

impl PanelStore {
    /// Create a store with an existing database
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the store at the default state path, falling back to an
    /// in-memory database when the file cannot be opened. State persistence
    /// is best-effort; the panel never refuses to start over it.
    pub fn open_default() -> Self {
        match Database::new(&paths::state_db_path()) {
            Ok(db) => Self::new(db),
            Err(e) => {
                warn!(error = %e, "Failed to open state database, state will not persist");
                let db = Database::in_memory().expect("in-memory sqlite");
                Self::new(db)
            }
        }
    }

    /// Get a raw state value
    fn get(&self, key: &str) -> Option<String> {
        self.db
            .conn()
            .query_row(
                "SELECT value FROM panel_state WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .ok()
    }

    /// Set a raw state value
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.conn().execute(
            "INSERT INTO panel_state (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, value, unix_timestamp()],
        )?;
        Ok(())
    }

    /// Uniform decoder for persisted blobs: raw string -> JSON parse ->
    /// shape validation. Every loader consumes stored data through here.
    fn decode<T, V>(&self, key: &str, validate: V) -> Result<T, StateDecodeError>
    where
        T: DeserializeOwned,
        V: FnOnce(&T) -> Result<(), &'static str>,
    {
        let raw = self.get(key).ok_or(StateDecodeError::Missing)?;
        let value: T = serde_json::from_str(&raw)?;
        validate(&value).map_err(StateDecodeError::Invalid)?;
        Ok(value)
    }

    /// Load the persisted position, or the default
    pub fn load_position(&self) -> PanelPosition {
        self.decode(POSITION_KEY, |_: &PanelPosition| Ok(()))
            .unwrap_or_else(|e| {
                debug!(key = POSITION_KEY, reason = %e, "Using default position");
                PanelPosition::default()
            })
    }

    /// Load the persisted size, or the default. Loaded values clamp to the
    /// minimums even when the stored blob was smaller.
    pub fn load_size(&self) -> PanelSize {
        self.decode(SIZE_KEY, |_: &PanelSize| Ok(()))
            .unwrap_or_else(|e| {
                debug!(key = SIZE_KEY, reason = %e, "Using default size");
                PanelSize::default()
            })
            .clamped()
    }

    /// Load the full geometry (position and size fall back independently)
    pub fn load_geometry(&self) -> PanelGeometry {
        PanelGeometry {
            position: self.load_position(),
            size: self.load_size(),
        }
    }

    /// Load the persisted color scheme, or the default. Partial blobs are
    /// rejected wholesale.
    pub fn load_theme(&self) -> PanelTheme {
        self.decode(COLORS_KEY, PanelTheme::validate)
            .unwrap_or_else(|e| {
                debug!(key = COLORS_KEY, reason = %e, "Using default colors");
                PanelTheme::default()
            })
    }

    /// Load the persisted target deck selection
    pub fn load_target_decks(&self) -> Vec<String> {
        self.decode(TARGET_DECKS_KEY, |_: &Vec<String>| Ok(()))
            .unwrap_or_else(|e| {
                debug!(key = TARGET_DECKS_KEY, reason = %e, "Starting with no target decks");
                Vec::new()
            })
    }

    /// Save position and size in one transaction, so a concurrent load never
    /// observes one half of a geometry update
    pub fn save_geometry(&self, geometry: &PanelGeometry) -> Result<()> {
        let size = geometry.size.clamped();
        let pos_json = serde_json::to_string(&geometry.position)?;
        let size_json = serde_json::to_string(&size)?;
        let now = unix_timestamp();

        let tx = self.db.conn().unchecked_transaction()?;
        for (key, value) in [(POSITION_KEY, &pos_json), (SIZE_KEY, &size_json)] {
            tx.execute(
                "INSERT INTO panel_state (key, value, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
                params![key, value, now],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Save the color scheme
    pub fn save_theme(&self, theme: &PanelTheme) -> Result<()> {
        let json = serde_json::to_string(theme)?;
        self.set(COLORS_KEY, &json)
    }

    /// Save the target deck selection
    pub fn save_target_decks(&self, decks: &[String]) -> Result<()> {
        let json = serde_json::to_string(decks)?;
        self.set(TARGET_DECKS_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> PanelStore {
        PanelStore::new(Database::in_memory().expect("Failed to create database"))
    }

    #[test]
    fn test_geometry_round_trip() {
        let store = test_store();

        let geometry = PanelGeometry {
            position: PanelPosition { x: 12, y: -3 },
            size: PanelSize {
                width: 80,
                height: 30,
            },
        };
        store.save_geometry(&geometry).expect("save");

        assert_eq!(store.load_geometry(), geometry);
    }

    #[test]
    fn test_defaults_when_nothing_stored() {
        let store = test_store();

        assert_eq!(store.load_position(), PanelPosition::default());
        assert_eq!(store.load_size(), PanelSize::default());
        assert_eq!(store.load_theme(), PanelTheme::default());
        assert!(store.load_target_decks().is_empty());
    }

    #[test]
    fn test_load_size_clamps_to_minimums() {
        let store = test_store();

        // Bypass save_geometry's clamp to simulate a blob written by an
        // older build or edited by hand
        store
            .set(SIZE_KEY, r#"{"width":1,"height":1}"#)
            .expect("set");

        let size = store.load_size();
        assert_eq!(size.width, MIN_PANEL_WIDTH);
        assert_eq!(size.height, MIN_PANEL_HEIGHT);
    }

    #[test]
    fn test_corrupt_key_does_not_invalidate_others() {
        let store = test_store();

        let geometry = PanelGeometry {
            position: PanelPosition { x: 7, y: 9 },
            size: PanelSize {
                width: 60,
                height: 20,
            },
        };
        store.save_geometry(&geometry).expect("save");
        store.set(COLORS_KEY, "{not json").expect("set");

        assert_eq!(store.load_theme(), PanelTheme::default());
        assert_eq!(store.load_geometry(), geometry);
    }

    #[test]
    fn test_partial_theme_rejected() {
        let store = test_store();

        // Missing bodyText
        store
            .set(
                COLORS_KEY,
                r##"{"headerBg":"#000000","headerText":"#FFFFFF","bodyBg":"#FFFFFF"}"##,
            )
            .expect("set");

        assert_eq!(store.load_theme(), PanelTheme::default());
    }

    #[test]
    fn test_empty_color_field_rejected() {
        let store = test_store();

        store
            .set(
                COLORS_KEY,
                r##"{"headerBg":"","headerText":"#FFFFFF","bodyBg":"#FFFFFF","bodyText":"#374151"}"##,
            )
            .expect("set");

        assert_eq!(store.load_theme(), PanelTheme::default());
    }

    #[test]
    fn test_theme_round_trip() {
        let store = test_store();

        let theme = PanelTheme {
            header_bg: "#3B82F6".to_string(),
            header_text: "#FFFFFF".to_string(),
            body_bg: "#111827".to_string(),
            body_text: "#E5E7EB".to_string(),
        };
        store.save_theme(&theme).expect("save");

        assert_eq!(store.load_theme(), theme);
    }

    #[test]
    fn test_target_decks_round_trip() {
        let store = test_store();

        let decks = vec!["Japanese::N5".to_string(), "Spanish".to_string()];
        store.save_target_decks(&decks).expect("save");

        assert_eq!(store.load_target_decks(), decks);
    }

    #[test]
    fn test_decode_error_taxonomy() {
        let store = test_store();

        let err = store
            .decode(POSITION_KEY, |_: &PanelPosition| Ok(()))
            .unwrap_err();
        assert!(matches!(err, StateDecodeError::Missing));

        store.set(POSITION_KEY, "][").expect("set");
        let err = store
            .decode(POSITION_KEY, |_: &PanelPosition| Ok(()))
            .unwrap_err();
        assert!(matches!(err, StateDecodeError::Malformed(_)));

        store.set(POSITION_KEY, r#"{"x":1,"y":2}"#).expect("set");
        let err = store
            .decode(POSITION_KEY, |_: &PanelPosition| Err("rejected"))
            .unwrap_err();
        assert!(matches!(err, StateDecodeError::Invalid("rejected")));
    }
}
