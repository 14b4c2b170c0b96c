//! Persistence: a flat string-keyed store plus the session snapshot
//! layered on top of it.

mod session_state;
mod store;

pub use session_state::{
    save_state, PersistedState, KEY_CYCLES, KEY_DATE, KEY_IS_POMODORO, KEY_KEEP_NOTIFICATIONS,
    KEY_TIME_LEFT,
};
pub use store::Store;

use std::path::PathBuf;

use crate::error::CoreError;

/// Returns `~/.config/pomoclock/`, honoring `POMOCLOCK_DATA_DIR`.
///
/// Set POMOCLOCK_DATA_DIR to point the store somewhere else (tests,
/// parallel instances).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let dir = match std::env::var_os("POMOCLOCK_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("pomoclock"),
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
