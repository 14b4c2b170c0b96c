//! The serialized form of the timer state.
//!
//! A flat mapping of well-known string keys, written after every mutation
//! that must survive a reload. Booleans are stored as `"true"`/`"false"`,
//! integers as decimal text, the date as `YYYY-MM-DD`. The running flag is
//! deliberately not part of the snapshot: rehydration always comes back
//! paused, the same way a reloaded page loses its interval.

use chrono::NaiveDate;

use super::Store;
use crate::clock::Clock;
use crate::error::StoreError;
use crate::timer::{Phase, TimerMachine};

pub const KEY_IS_POMODORO: &str = "isPomodoro";
pub const KEY_CYCLES: &str = "cycles";
pub const KEY_TIME_LEFT: &str = "timeLeft";
pub const KEY_KEEP_NOTIFICATIONS: &str = "keepNotifications";
pub const KEY_DATE: &str = "date";

/// Snapshot of the machine as stored in the kv store.
///
/// Every field is optional on the way out: a missing or unparseable value
/// falls back to the in-machine default instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub is_focus: Option<bool>,
    pub cycles: Option<u32>,
    pub time_left: Option<u64>,
    pub keep_notifications: Option<bool>,
    pub date: Option<NaiveDate>,
}

impl PersistedState {
    /// Read the snapshot; `None` when nothing usable was ever stored.
    ///
    /// # Errors
    /// Returns an error only when the store itself fails.
    pub fn load(store: &Store) -> Result<Option<Self>, StoreError> {
        let state = Self {
            is_focus: read_parsed(store, KEY_IS_POMODORO)?,
            cycles: read_parsed(store, KEY_CYCLES)?,
            time_left: read_parsed(store, KEY_TIME_LEFT)?,
            keep_notifications: read_parsed(store, KEY_KEEP_NOTIFICATIONS)?,
            date: read_parsed(store, KEY_DATE)?,
        };
        if state == Self::default() {
            Ok(None)
        } else {
            Ok(Some(state))
        }
    }
}

/// Write one full snapshot of the machine. One synchronous write per key;
/// called after every mutation that must survive a reload.
///
/// # Errors
/// Returns an error if a write fails.
pub fn save_state(
    store: &Store,
    machine: &TimerMachine,
    clock: &dyn Clock,
) -> Result<(), StoreError> {
    store.set(KEY_IS_POMODORO, bool_text(machine.phase() == Phase::Focus))?;
    store.set(KEY_CYCLES, &machine.cycle_count().to_string())?;
    store.set(KEY_TIME_LEFT, &machine.remaining_secs(clock).to_string())?;
    store.set(
        KEY_KEEP_NOTIFICATIONS,
        bool_text(machine.keep_notifications()),
    )?;
    store.set(KEY_DATE, &clock.today().to_string())?;
    Ok(())
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn read_parsed<T: std::str::FromStr>(store: &Store, key: &str) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match raw.parse::<T>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            log::debug!("ignoring unparseable value for {key}: {raw:?}");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::TimerConfig;

    #[test]
    fn empty_store_loads_nothing() {
        let store = Store::open_in_memory().unwrap();
        assert!(PersistedState::load(&store).unwrap().is_none());
    }

    #[test]
    fn same_day_round_trip_reproduces_the_machine() {
        let store = Store::open_in_memory().unwrap();
        let clock = ManualClock::new();
        let config = TimerConfig {
            focus_secs: 100,
            short_break_secs: 20,
            long_break_secs: 60,
            long_break_interval: 4,
        };

        let mut machine = TimerMachine::new(config.clone(), &clock);
        machine.start(&clock);
        clock.advance_secs(100);
        machine.tick(&clock); // into the first break
        machine.start(&clock);
        clock.advance_secs(7);
        machine.tick(&clock);
        machine.pause(&clock);
        save_state(&store, &machine, &clock).unwrap();

        let saved = PersistedState::load(&store).unwrap();
        let restored = TimerMachine::rehydrate(config, saved, &clock);
        assert_eq!(restored.phase(), machine.phase());
        assert_eq!(
            restored.remaining_secs(&clock),
            machine.remaining_secs(&clock)
        );
        assert_eq!(restored.cycle_count(), machine.cycle_count());
        assert!(!restored.is_running());
    }

    #[test]
    fn snapshot_from_a_previous_day_is_discarded() {
        let store = Store::open_in_memory().unwrap();
        let clock = ManualClock::new();
        let config = TimerConfig::default();

        let mut machine = TimerMachine::new(config.clone(), &clock);
        machine.start(&clock);
        clock.advance_secs(30);
        machine.pause(&clock);
        save_state(&store, &machine, &clock).unwrap();

        clock.next_day();
        let saved = PersistedState::load(&store).unwrap();
        let restored = TimerMachine::rehydrate(config.clone(), saved, &clock);
        assert_eq!(restored.phase(), Phase::Focus);
        assert_eq!(restored.remaining_secs(&clock), config.focus_secs);
        assert_eq!(restored.cycle_count(), 0);
    }

    #[test]
    fn malformed_values_read_as_absent() {
        let store = Store::open_in_memory().unwrap();
        store.set(KEY_CYCLES, "banana").unwrap();
        store.set(KEY_TIME_LEFT, "90").unwrap();
        store.set(KEY_DATE, "someday").unwrap();
        let state = PersistedState::load(&store).unwrap().unwrap();
        assert!(state.cycles.is_none());
        assert_eq!(state.time_left, Some(90));
        assert!(state.date.is_none());
    }

    #[test]
    fn booleans_are_stored_as_text() {
        let store = Store::open_in_memory().unwrap();
        let clock = ManualClock::new();
        let machine = TimerMachine::new(TimerConfig::default(), &clock);
        save_state(&store, &machine, &clock).unwrap();
        assert_eq!(store.get(KEY_IS_POMODORO).unwrap().unwrap(), "true");
        assert_eq!(store.get(KEY_KEEP_NOTIFICATIONS).unwrap().unwrap(), "true");
    }
}
