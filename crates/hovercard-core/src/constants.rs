//! Application constants and configuration defaults
//!
//! Centralized location for magic numbers and default values

use std::time::Duration;

/// Panel geometry defaults (terminal cells)
pub mod panel {
    /// Default panel position when nothing is persisted
    pub const DEFAULT_POSITION: (i32, i32) = (4, 2);

    /// Default panel width
    pub const DEFAULT_WIDTH: u16 = 70;

    /// Default panel height
    pub const DEFAULT_HEIGHT: u16 = 22;

    /// Minimum panel width enforced on load and on resize
    pub const MIN_PANEL_WIDTH: u16 = 44;

    /// Minimum panel height enforced on load and on resize
    pub const MIN_PANEL_HEIGHT: u16 = 12;
}

/// Deck search configuration
pub mod search {
    use super::*;

    /// Trailing-edge debounce window between the last keystroke and the
    /// committed filter term
    pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);
}

/// HTTP client configuration
pub mod http {
    use super::*;

    /// Connection timeout for AnkiConnect requests (local daemon)
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Overall request timeout
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}

/// AnkiConnect wire protocol
pub mod anki {
    /// Default AnkiConnect endpoint
    pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8765";

    /// AnkiConnect API version sent with every request
    pub const PROTOCOL_VERSION: u32 = 6;
}

/// UI configuration
pub mod ui {
    use super::*;

    /// Config directory name
    pub const CONFIG_DIR_NAME: &str = ".hovercard";

    /// Event-loop tick interval (drives debounce, channel draining, toasts)
    pub const TICK_INTERVAL: Duration = Duration::from_millis(50);
}
