//! Injectable time source.
//!
//! Gap walks, daily limits and cache expiry all ask a [`Clock`] for "now"
//! instead of reading the wall clock directly, so tests can pin time.

use std::sync::Mutex;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveTime};

/// A source of the current local time.
pub trait Clock: Send + Sync {
    /// Current instant, carrying the local UTC offset.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Current local calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Time remaining until the last millisecond of the current local day.
    ///
    /// Never negative.
    fn until_end_of_day(&self) -> Duration {
        let now = self.now();
        let end_of_day = now
            .date_naive()
            .and_time(last_millisecond_of_day())
            .and_local_timezone(*now.offset())
            .single();
        match end_of_day {
            Some(end) if end > now => end - now,
            _ => Duration::zero(),
        }
    }
}

fn last_millisecond_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

/// The system wall clock in the server's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A manually controlled clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Pin the clock to midday UTC on the given date.
    pub fn at_date(date: NaiveDate) -> Self {
        let noon = date
            .and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN))
            .and_utc()
            .fixed_offset();
        Self::new(noon)
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    /// Jump the clock to an absolute instant.
    pub fn set(&self, to: DateTime<FixedOffset>) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = to;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
