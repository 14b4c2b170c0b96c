//! Timer durations, loaded once at startup.
//!
//! The four duration keys live in the same flat store as the session
//! snapshot and are read a single time when the process starts; the
//! machine never observes a mid-session duration change. A missing or
//! unparseable value falls back to its default, field by field.

use crate::error::StoreError;
use crate::storage::Store;

pub const KEY_FOCUS: &str = "POMODORO";
pub const KEY_SHORT_BREAK: &str = "SHORT_BREAK";
pub const KEY_LONG_BREAK: &str = "LONG_BREAK";
pub const KEY_LONG_BREAK_INTERVAL: &str = "LONG_BREAK_INTERVAL";

/// Immutable phase durations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig {
    /// Focus phase length in seconds.
    pub focus_secs: u64,
    /// Short break length in seconds.
    pub short_break_secs: u64,
    /// Long break length in seconds.
    pub long_break_secs: u64,
    /// Completed cycles before a break is upgraded to a long one.
    pub long_break_interval: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            long_break_interval: 4,
        }
    }
}

impl TimerConfig {
    /// Load from the store, falling back to defaults field by field.
    ///
    /// # Errors
    ///
    /// Returns an error only when the store itself fails; bad values
    /// never do.
    pub fn load(store: &Store) -> Result<Self, StoreError> {
        let defaults = Self::default();
        Ok(Self {
            focus_secs: read_positive(store, KEY_FOCUS)?.unwrap_or(defaults.focus_secs),
            short_break_secs: read_positive(store, KEY_SHORT_BREAK)?
                .unwrap_or(defaults.short_break_secs),
            long_break_secs: read_positive(store, KEY_LONG_BREAK)?
                .unwrap_or(defaults.long_break_secs),
            long_break_interval: read_interval(store, KEY_LONG_BREAK_INTERVAL)?
                .unwrap_or(defaults.long_break_interval),
        })
    }

    /// Persist every duration key.
    ///
    /// # Errors
    ///
    /// Returns an error if a write fails.
    pub fn save(&self, store: &Store) -> Result<(), StoreError> {
        store.set(KEY_FOCUS, &self.focus_secs.to_string())?;
        store.set(KEY_SHORT_BREAK, &self.short_break_secs.to_string())?;
        store.set(KEY_LONG_BREAK, &self.long_break_secs.to_string())?;
        store.set(KEY_LONG_BREAK_INTERVAL, &self.long_break_interval.to_string())?;
        Ok(())
    }
}

// Zero-length phases are meaningless; treat them as absent.
fn read_positive(store: &Store, key: &str) -> Result<Option<u64>, StoreError> {
    let value = store
        .get(key)?
        .and_then(|raw| match raw.parse::<u64>() {
            Ok(v) => Some(v),
            Err(_) => {
                log::debug!("ignoring unparseable value for {key}: {raw:?}");
                None
            }
        })
        .filter(|&v| v > 0);
    Ok(value)
}

fn read_interval(store: &Store, key: &str) -> Result<Option<u32>, StoreError> {
    let value = store
        .get(key)?
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|&v| v >= 1);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_pomodoro() {
        let cfg = TimerConfig::default();
        assert_eq!(cfg.focus_secs, 1500);
        assert_eq!(cfg.short_break_secs, 300);
        assert_eq!(cfg.long_break_secs, 900);
        assert_eq!(cfg.long_break_interval, 4);
    }

    #[test]
    fn load_from_empty_store_returns_defaults() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(TimerConfig::load(&store).unwrap(), TimerConfig::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = Store::open_in_memory().unwrap();
        let cfg = TimerConfig {
            focus_secs: 600,
            short_break_secs: 60,
            long_break_secs: 240,
            long_break_interval: 3,
        };
        cfg.save(&store).unwrap();
        assert_eq!(TimerConfig::load(&store).unwrap(), cfg);
    }

    #[test]
    fn malformed_values_fall_back_per_field() {
        let store = Store::open_in_memory().unwrap();
        store.set(KEY_FOCUS, "600").unwrap();
        store.set(KEY_SHORT_BREAK, "soon-ish").unwrap();
        store.set(KEY_LONG_BREAK_INTERVAL, "0").unwrap();
        let cfg = TimerConfig::load(&store).unwrap();
        assert_eq!(cfg.focus_secs, 600);
        assert_eq!(cfg.short_break_secs, TimerConfig::default().short_break_secs);
        assert_eq!(
            cfg.long_break_interval,
            TimerConfig::default().long_break_interval
        );
    }
}
