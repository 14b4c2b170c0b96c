//! Foreground countdown.
//!
//! This command is the execution context that owns the live tick source:
//! it starts the current phase, drives the machine once per second,
//! persists every tick, and turns transition events into notifications
//! and sound cues. It exits when the phase completes (paused at the next
//! phase, per the manual-start rule) or on Ctrl-C (paused in place).

use std::io::Write;
use std::time::Duration;

use clap::Args;
use tokio::sync::mpsc;

use pomoclock_core::{
    Clock, Cue, CuePlayer, Event, Notifier, Phase, Store, SystemClock, Ticker, TimerMachine,
};

use crate::alerts::{DesktopNotifier, SystemCuePlayer};

#[derive(Args)]
pub struct RunArgs {
    /// Suppress sound cues
    #[arg(long)]
    pub quiet: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_phase(args))
}

async fn run_phase(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open()?;
    let clock = SystemClock;
    let mut machine = super::load_machine(&store, &clock)?;

    let notifier = DesktopNotifier::new();
    let mut cues = SystemCuePlayer::new(args.quiet);

    cues.play(Cue::Click);
    if machine.start(&clock).is_none() && !machine.is_running() {
        println!("nothing to count down; try `pomoclock timer reset`");
        return Ok(());
    }
    super::save_machine(&store, &machine, &clock)?;
    render_status_line(&machine, &clock)?;

    let (tx, mut rx) = mpsc::channel(1);
    let mut ticker = Ticker::new();
    ticker.arm(Duration::from_secs(1), tx);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                cues.play(Cue::Click);
                machine.pause(&clock);
                break;
            }
            maybe_tick = rx.recv() => {
                if maybe_tick.is_none() {
                    break;
                }
                let event = machine.tick(&clock);
                super::save_machine(&store, &machine, &clock)?;
                render_status_line(&machine, &clock)?;
                match event {
                    Some(Event::BreakEndingSoon { .. }) => cues.play(Cue::RunningOut),
                    Some(Event::PhaseCompleted { from, .. }) => {
                        cues.cancel(Cue::RunningOut);
                        if from == Phase::Focus {
                            cues.play(Cue::PhaseComplete);
                        }
                        if machine.keep_notifications() {
                            let (title, body) = completion_message(from);
                            notifier.notify(title, body);
                        }
                        break;
                    }
                    Some(Event::DayRolledOver { .. }) => break,
                    _ => {}
                }
            }
        }
    }

    // Every exit path lands here: tick source disarmed, lingering cue
    // silenced, frozen state persisted.
    ticker.disarm();
    cues.cancel(Cue::RunningOut);
    super::save_machine(&store, &machine, &clock)?;
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&machine.snapshot(&clock))?
    );
    Ok(())
}

fn completion_message(from: Phase) -> (&'static str, &'static str) {
    match from {
        Phase::Focus => ("Focus complete", "Time to take a break."),
        Phase::Break => ("Break over", "Time to get back to work!"),
    }
}

fn render_status_line(machine: &TimerMachine, clock: &dyn Clock) -> std::io::Result<()> {
    let remaining = machine.remaining_secs(clock);
    let label = match machine.phase() {
        Phase::Focus => "focus",
        Phase::Break => "break",
    };
    print!(
        "\r{label} {:02}:{:02}  cycles {}   ",
        remaining / 60,
        remaining % 60,
        machine.cycle_count()
    );
    std::io::stdout().flush()
}
