use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every state change in the machine produces an Event.
/// The CLI prints them; the notifier and cue player consume them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    Started {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Paused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Reset {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A phase ran down to zero and the machine advanced.
    PhaseCompleted {
        from: Phase,
        to: Phase,
        /// Full duration of the phase the machine advanced into.
        next_secs: u64,
        cycle_count: u32,
        at: DateTime<Utc>,
    },
    /// A break was cut short. Advances exactly like a completion but is
    /// kept distinct so collaborators can tell it apart from a natural
    /// phase end.
    BreakSkipped {
        skipped_secs: u64,
        cycle_count: u32,
        at: DateTime<Utc>,
    },
    /// A break is about to end.
    BreakEndingSoon {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// The calendar date moved past the last active date; the machine
    /// was reset to a fresh focus phase.
    DayRolledOver {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        remaining_secs: u64,
        total_secs: u64,
        running: bool,
        cycle_count: u32,
        next_break_long: bool,
        keep_notifications: bool,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::Paused {
            remaining_secs: 90,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Paused");
        assert_eq!(json["remaining_secs"], 90);
    }

    #[test]
    fn phase_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Phase::Focus).unwrap(), "focus");
        assert_eq!(serde_json::to_value(Phase::Break).unwrap(), "break");
    }
}
