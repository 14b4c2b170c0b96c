//! Timer state machine.
//!
//! Wall-clock based: while running, the machine keeps the absolute
//! instant the countdown ends and recomputes the remainder on every
//! tick, so delayed or coalesced ticks never stretch a phase. It does
//! not use internal threads - the caller is responsible for calling
//! `tick()` once per second while running.
//!
//! ## State Transitions
//!
//! ```text
//! Focus <-> Break, each running or paused
//! ```
//!
//! There is no terminal state; the machine cycles until the user
//! intervenes or the day rolls over.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::config::TimerConfig;
use crate::events::Event;
use crate::storage::PersistedState;

/// Seconds left on a break at which the running-out cue fires.
const ENDING_SOON_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

/// Core timer state machine.
///
/// Owns the current phase, the countdown, and the cycle counter. Every
/// command is total over well-formed state: there are no error returns,
/// only events (or `None` for no-ops).
#[derive(Debug, Clone)]
pub struct TimerMachine {
    config: TimerConfig,
    phase: Phase,
    remaining_secs: u64,
    running: bool,
    cycle_count: u32,
    last_active_date: NaiveDate,
    keep_notifications: bool,
    /// Wall-clock instant (epoch ms) the countdown ends. Present only
    /// while running.
    deadline_ms: Option<u64>,
    /// One-shot latch for the break running-out cue.
    ending_soon_fired: bool,
}

impl TimerMachine {
    /// Create a fresh machine: paused at the start of a focus phase.
    pub fn new(config: TimerConfig, clock: &dyn Clock) -> Self {
        let remaining_secs = config.focus_secs;
        Self {
            config,
            phase: Phase::Focus,
            remaining_secs,
            running: false,
            cycle_count: 0,
            last_active_date: clock.today(),
            keep_notifications: true,
            deadline_ms: None,
            ending_soon_fired: false,
        }
    }

    /// Rebuild the machine from a persisted snapshot.
    ///
    /// A snapshot from a previous calendar day (or with no readable
    /// date) is discarded wholesale, which is the startup half of the
    /// daily-reset rule. Rehydration always comes back paused.
    pub fn rehydrate(
        config: TimerConfig,
        saved: Option<PersistedState>,
        clock: &dyn Clock,
    ) -> Self {
        let mut machine = Self::new(config, clock);
        let Some(saved) = saved else {
            return machine;
        };
        if saved.date != Some(clock.today()) {
            log::info!("discarding persisted state dated {:?}", saved.date);
            return machine;
        }
        if let Some(is_focus) = saved.is_focus {
            machine.phase = if is_focus { Phase::Focus } else { Phase::Break };
        }
        if let Some(cycles) = saved.cycles {
            machine.cycle_count = cycles;
        }
        if let Some(time_left) = saved.time_left {
            machine.remaining_secs = time_left.min(machine.current_phase_secs());
        } else {
            machine.remaining_secs = machine.current_phase_secs();
        }
        if let Some(keep) = saved.keep_notifications {
            machine.keep_notifications = keep;
        }
        machine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn cycle_count(&self) -> u32 {
        self.cycle_count
    }

    pub fn keep_notifications(&self) -> bool {
        self.keep_notifications
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn last_active_date(&self) -> NaiveDate {
        self.last_active_date
    }

    /// Seconds left on the current phase, recomputed from the deadline
    /// while running.
    pub fn remaining_secs(&self, clock: &dyn Clock) -> u64 {
        if self.running {
            self.compute_remaining(clock)
        } else {
            self.remaining_secs
        }
    }

    /// Full duration of the current phase.
    pub fn current_phase_secs(&self) -> u64 {
        match self.phase {
            Phase::Focus => self.config.focus_secs,
            Phase::Break => self.break_secs(),
        }
    }

    /// Whether the break after the current cycle is a long one.
    ///
    /// While mid-break this also names the running break: the counter
    /// only advances when the break completes, so the decision made at
    /// entry is reproduced exactly.
    pub fn next_break_is_long(&self) -> bool {
        (self.cycle_count + 1) % self.config.long_break_interval == 0
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, clock: &dyn Clock) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            remaining_secs: self.remaining_secs(clock),
            total_secs: self.current_phase_secs(),
            running: self.running,
            cycle_count: self.cycle_count,
            next_break_long: self.next_break_is_long(),
            keep_notifications: self.keep_notifications,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the countdown. No effect if already running.
    pub fn start(&mut self, clock: &dyn Clock) -> Option<Event> {
        self.roll_day_if_needed(clock);
        if self.running || self.remaining_secs == 0 {
            return None;
        }
        self.running = true;
        self.deadline_ms = Some(
            clock
                .now_ms()
                .saturating_add(self.remaining_secs.saturating_mul(1000)),
        );
        Some(Event::Started {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Freeze the countdown. No effect if already paused.
    pub fn pause(&mut self, clock: &dyn Clock) -> Option<Event> {
        self.roll_day_if_needed(clock);
        if !self.running {
            return None;
        }
        self.remaining_secs = self.compute_remaining(clock);
        self.running = false;
        self.deadline_ms = None;
        if self.remaining_secs == 0 {
            // The deadline passed while nobody was ticking; pausing a
            // dead countdown completes the phase instead of freezing it.
            return Some(self.complete_phase());
        }
        Some(Event::Paused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Called once per second while running. Recomputes the remainder
    /// from the stored deadline rather than decrementing a counter, so
    /// a delayed tick never stretches the phase.
    pub fn tick(&mut self, clock: &dyn Clock) -> Option<Event> {
        if self.roll_day_if_needed(clock) {
            return Some(Event::DayRolledOver { at: Utc::now() });
        }
        if !self.running {
            return None;
        }
        self.remaining_secs = self.compute_remaining(clock);
        if self.remaining_secs == 0 {
            return Some(self.complete_phase());
        }
        if self.phase == Phase::Break
            && self.remaining_secs <= ENDING_SOON_SECS
            && !self.ending_soon_fired
        {
            self.ending_soon_fired = true;
            return Some(Event::BreakEndingSoon {
                remaining_secs: self.remaining_secs,
                at: Utc::now(),
            });
        }
        None
    }

    /// Stop and restore the current phase to its full duration. Phase
    /// and cycle count are untouched; mid-break this recomputes the
    /// long/short choice the same way phase completion does.
    pub fn reset(&mut self, clock: &dyn Clock) -> Event {
        self.roll_day_if_needed(clock);
        self.running = false;
        self.deadline_ms = None;
        self.ending_soon_fired = false;
        self.remaining_secs = self.current_phase_secs();
        Event::Reset {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Cut the current break short, taking the same transition a
    /// natural completion would. No-op during focus.
    pub fn skip(&mut self, clock: &dyn Clock) -> Option<Event> {
        self.roll_day_if_needed(clock);
        if self.phase != Phase::Break {
            return None;
        }
        let skipped_secs = self.remaining_secs(clock);
        self.advance();
        Some(Event::BreakSkipped {
            skipped_secs,
            cycle_count: self.cycle_count,
            at: Utc::now(),
        })
    }

    /// Reset to a fresh focus phase for a new day.
    pub fn apply_daily_reset(&mut self, clock: &dyn Clock) -> Event {
        self.cycle_count = 0;
        self.phase = Phase::Focus;
        self.remaining_secs = self.config.focus_secs;
        self.running = false;
        self.deadline_ms = None;
        self.ending_soon_fired = false;
        self.last_active_date = clock.today();
        Event::DayRolledOver { at: Utc::now() }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn roll_day_if_needed(&mut self, clock: &dyn Clock) -> bool {
        if clock.today() == self.last_active_date {
            return false;
        }
        log::info!("calendar date changed, applying daily reset");
        self.apply_daily_reset(clock);
        true
    }

    fn complete_phase(&mut self) -> Event {
        let (from, to) = self.advance();
        Event::PhaseCompleted {
            from,
            to,
            next_secs: self.remaining_secs,
            cycle_count: self.cycle_count,
            at: Utc::now(),
        }
    }

    /// The one transition: decides break length on the way out of
    /// focus, counts the cycle on the way out of a break, and always
    /// lands paused.
    fn advance(&mut self) -> (Phase, Phase) {
        let from = self.phase;
        match self.phase {
            Phase::Focus => {
                // Break length is decided before the counter moves; the
                // counter itself advances only when the break completes.
                self.remaining_secs = self.break_secs();
                self.phase = Phase::Break;
            }
            Phase::Break => {
                self.cycle_count += 1;
                self.phase = Phase::Focus;
                self.remaining_secs = self.config.focus_secs;
            }
        }
        self.running = false;
        self.deadline_ms = None;
        self.ending_soon_fired = false;
        (from, self.phase)
    }

    fn break_secs(&self) -> u64 {
        if self.next_break_is_long() {
            self.config.long_break_secs
        } else {
            self.config.short_break_secs
        }
    }

    fn compute_remaining(&self, clock: &dyn Clock) -> u64 {
        let Some(deadline) = self.deadline_ms else {
            return self.remaining_secs;
        };
        let left_ms = deadline.saturating_sub(clock.now_ms());
        // round((deadline - now) / 1s), clamped to the phase duration
        ((left_ms + 500) / 1000).min(self.current_phase_secs())
    }
}
