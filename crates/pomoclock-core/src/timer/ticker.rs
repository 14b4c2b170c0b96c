//! Cancellable repeating tick source.
//!
//! At most one tick task is ever live: arming aborts the previous task
//! before spawning the next, and dropping the ticker disarms whatever is
//! still armed. The task only delivers ticks; all countdown math stays
//! in the state machine.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Owns the repeating timer task.
#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Arm the tick source, replacing any armed task (disarm-then-arm).
    ///
    /// Ticks are delivered over `tx` once per `period` until the ticker
    /// is disarmed or the receiver goes away.
    pub fn arm(&mut self, period: Duration, tx: mpsc::Sender<()>) {
        self.disarm();
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // A tokio interval fires immediately; swallow that so the
            // first delivered tick lands one full period after arming.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        }));
    }

    /// Abort the armed task, if any.
    pub fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_ticks() {
        let (tx, mut rx) = mpsc::channel(1);
        let mut ticker = Ticker::new();
        ticker.arm(Duration::from_millis(5), tx);
        assert!(rx.recv().await.is_some());
        assert!(ticker.is_armed());
    }

    #[tokio::test]
    async fn rearming_replaces_the_armed_task() {
        let (tx1, mut rx1) = mpsc::channel(1);
        let (tx2, mut rx2) = mpsc::channel(1);
        let mut ticker = Ticker::new();
        ticker.arm(Duration::from_millis(5), tx1);
        ticker.arm(Duration::from_millis(5), tx2);
        // The first task was aborted, so its sender is gone; draining
        // terminates only once that channel closes.
        while rx1.recv().await.is_some() {}
        assert!(rx2.recv().await.is_some());
    }

    #[tokio::test]
    async fn disarm_stops_tick_delivery() {
        let (tx, mut rx) = mpsc::channel(1);
        let mut ticker = Ticker::new();
        ticker.arm(Duration::from_millis(5), tx);
        ticker.disarm();
        while rx.recv().await.is_some() {}
        assert!(!ticker.is_armed());
    }

    #[tokio::test]
    async fn drop_disarms() {
        let (tx, mut rx) = mpsc::channel(1);
        {
            let mut ticker = Ticker::new();
            ticker.arm(Duration::from_millis(5), tx);
        }
        while rx.recv().await.is_some() {}
    }
}
