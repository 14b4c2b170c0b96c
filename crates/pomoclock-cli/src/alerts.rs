//! Desktop notification and sound-cue implementations.
//!
//! Both collaborators are fire-and-forget: an unreachable notification
//! daemon or a missing sound theme degrades to a log line or the
//! terminal bell, never to an error.

use std::process::{Child, Command, Stdio};

use notify_rust::Notification;
use pomoclock_core::{Cue, CuePlayer, Notifier};

/// System sound files tried in order for the completion cue.
const COMPLETE_SOUNDS: &[(&str, &str)] = &[
    ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
    ("aplay", "/usr/share/sounds/sound-icons/guitar-11.wav"),
];

/// System sound files tried in order for the running-out cue.
const RUNNING_OUT_SOUNDS: &[(&str, &str)] = &[
    ("paplay", "/usr/share/sounds/freedesktop/stereo/bell.oga"),
    ("aplay", "/usr/share/sounds/sound-icons/prompt.wav"),
];

pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) {
        let result = Notification::new()
            .summary(title)
            .body(body)
            .appname("pomoclock")
            .icon("alarm-clock")
            .show();
        if let Err(e) = result {
            log::warn!("desktop notification failed: {e}");
        }
    }
}

/// Plays cues through whatever sound player the system has, falling
/// back to the terminal bell. The running-out cue keeps its child
/// process around so it can be cancelled when the break ends early.
pub struct SystemCuePlayer {
    quiet: bool,
    running_out: Option<Child>,
}

impl SystemCuePlayer {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            running_out: None,
        }
    }

    fn spawn_player(sources: &[(&str, &str)]) -> Option<Child> {
        for (player, file) in sources {
            if !std::path::Path::new(file).exists() {
                continue;
            }
            match Command::new(player)
                .arg(file)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
            {
                Ok(child) => return Some(child),
                Err(e) => log::debug!("{player} failed to start: {e}"),
            }
        }
        None
    }

    fn bell() {
        print!("\x07");
        let _ = std::io::Write::flush(&mut std::io::stdout());
    }
}

impl CuePlayer for SystemCuePlayer {
    fn play(&mut self, cue: Cue) {
        if self.quiet {
            return;
        }
        match cue {
            Cue::Click => Self::bell(),
            Cue::PhaseComplete => {
                if Self::spawn_player(COMPLETE_SOUNDS).is_none() {
                    Self::bell();
                }
            }
            Cue::RunningOut => {
                self.cancel(Cue::RunningOut);
                self.running_out = Self::spawn_player(RUNNING_OUT_SOUNDS);
            }
        }
    }

    fn cancel(&mut self, cue: Cue) {
        if cue != Cue::RunningOut {
            return;
        }
        if let Some(mut child) = self.running_out.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
