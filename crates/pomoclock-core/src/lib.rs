//! # Pomoclock Core Library
//!
//! This library provides the core logic for the Pomoclock Pomodoro timer:
//! the phase state machine, its persistence contract, and the collaborator
//! seams a front end plugs into. The CLI binary is a thin layer over this
//! crate; any other front end would drive it the same way.
//!
//! ## Architecture
//!
//! - **Timer Machine**: A wall-clock-based state machine that requires the
//!   caller to periodically invoke `tick()` while the countdown is running
//! - **Storage**: A flat string-keyed SQLite store holding the duration
//!   settings and the session snapshot
//! - **Alerts**: `Notifier` and `CuePlayer` traits consumed by the front
//!   end; the core decides *when* they fire, never *how*
//!
//! ## Key Components
//!
//! - [`TimerMachine`]: Phase transitions, cycle counting, daily reset
//! - [`Store`]: Key/value persistence
//! - [`TimerConfig`]: Immutable durations loaded once at startup
//! - [`Ticker`]: The single armed tick source

pub mod alert;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use alert::{Cue, CuePlayer, Notifier};
pub use clock::{Clock, SystemClock};
pub use config::TimerConfig;
pub use error::{CoreError, StoreError};
pub use events::Event;
pub use storage::{save_state, PersistedState, Store};
pub use timer::{Phase, Ticker, TimerMachine};
