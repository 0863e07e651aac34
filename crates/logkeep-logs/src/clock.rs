//! Time source used for timestamps, active-file dates, and rotation suffixes

use chrono::{DateTime, Local, NaiveDate, Utc};
use parking_lot::Mutex;

/// Source of the current instant and calendar date
pub trait Clock: Send + Sync {
    /// Current instant, used for record timestamps and rotation suffixes
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date that names the active file
    fn today(&self) -> NaiveDate;
}

/// Wall clock. Dates follow the local timezone so files roll at local midnight.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Settable clock for deterministic callers and tests.
/// `today()` is the UTC date of the held instant.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    fn today(&self) -> NaiveDate {
        self.now.lock().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_advance_crosses_midnight() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 0).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        clock.advance(chrono::Duration::minutes(2));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }
}
