use clap::Subcommand;
use pomoclock_core::{Store, SystemClock};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the countdown for the current phase
    Start,
    /// Freeze the countdown
    Pause,
    /// Start if paused, pause if running
    Toggle,
    /// Restore the current phase to its full duration
    Reset,
    /// Cut the current break short (no-op during focus)
    Skip,
    /// Print the current timer state as JSON
    Status,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open()?;
    let clock = SystemClock;
    let mut machine = super::load_machine(&store, &clock)?;

    let event = match action {
        TimerAction::Start => machine.start(&clock),
        TimerAction::Pause => machine.pause(&clock),
        TimerAction::Toggle => {
            if machine.is_running() {
                machine.pause(&clock)
            } else {
                machine.start(&clock)
            }
        }
        TimerAction::Reset => Some(machine.reset(&clock)),
        TimerAction::Skip => {
            let event = machine.skip(&clock);
            if event.is_none() {
                eprintln!("skip only applies to breaks");
            }
            event
        }
        TimerAction::Status => Some(machine.snapshot(&clock)),
    };

    super::save_machine(&store, &machine, &clock)?;
    // No-op commands still report where the machine stands.
    let event = event.unwrap_or_else(|| machine.snapshot(&clock));
    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}
