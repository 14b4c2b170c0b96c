pub mod config;
pub mod run;
pub mod timer;

use pomoclock_core::{save_state, Clock, PersistedState, Store, TimerConfig, TimerMachine};

/// Open the settings and rehydrate the machine the way every command
/// does: config read once, stale snapshots discarded.
pub fn load_machine(
    store: &Store,
    clock: &dyn Clock,
) -> Result<TimerMachine, Box<dyn std::error::Error>> {
    let config = TimerConfig::load(store)?;
    let saved = PersistedState::load(store)?;
    Ok(TimerMachine::rehydrate(config, saved, clock))
}

/// Persist the full snapshot after a mutation.
pub fn save_machine(
    store: &Store,
    machine: &TimerMachine,
    clock: &dyn Clock,
) -> Result<(), Box<dyn std::error::Error>> {
    save_state(store, machine, clock)?;
    Ok(())
}
