//! Filesystem locations for Hovercard state and logs

use std::path::PathBuf;

use crate::constants::ui::CONFIG_DIR_NAME;

/// Root config directory (`~/.hovercard`)
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Directory for log files
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Path to the panel state database
pub fn state_db_path() -> PathBuf {
    config_dir().join("hovercard.db")
}
