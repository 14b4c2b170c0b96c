use chrono::NaiveDate;

/// Wall-clock time source.
///
/// The machine only needs second-level accuracy: countdown math works in
/// epoch milliseconds, the daily-reset rule in local calendar dates.
/// Injecting the clock keeps every time-dependent branch testable.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;

    /// The current local calendar date.
    fn today(&self) -> NaiveDate;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Manually advanced clock for tests.
#[cfg(test)]
pub(crate) struct ManualClock {
    ms: std::cell::Cell<u64>,
    today: std::cell::Cell<NaiveDate>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            ms: std::cell::Cell::new(1_000_000),
            today: std::cell::Cell::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
        }
    }

    pub fn advance_secs(&self, secs: u64) {
        self.ms.set(self.ms.get() + secs * 1000);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.ms.set(self.ms.get() + ms);
    }

    pub fn next_day(&self) {
        self.today.set(self.today.get().succ_opt().unwrap());
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.ms.get()
    }

    fn today(&self) -> NaiveDate {
        self.today.get()
    }
}
