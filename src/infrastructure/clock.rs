//! Clock implementations.

use std::sync::Mutex;

use chrono::{DateTime, Duration, FixedOffset, Local};

use crate::domain::ports::Clock;

/// Reads the system clock in the machine's local offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Clock that only moves when told to.
///
/// Used to drive cache expiry and calendar-day changes in tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl ManualClock {
    /// Start at `now`.
    pub const fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: std::time::Duration) {
        let by = Duration::from_std(by).unwrap_or(Duration::MAX);
        let mut now = self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *now = now.checked_add_signed(by).unwrap_or(*now);
    }

    /// Jump to `to`.
    pub fn set(&self, to: DateTime<FixedOffset>) {
        *self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 2, 28, h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(at(10, 0));
        clock.advance(std::time::Duration::from_secs(90));
        assert_eq!(clock.now(), at(10, 1) + Duration::seconds(30));
    }

    #[test]
    fn test_until_midnight_and_day_rollover() {
        let clock = ManualClock::new(at(23, 30));
        assert_eq!(clock.until_midnight(), std::time::Duration::from_secs(30 * 60));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 2, 28).unwrap());

        clock.advance(std::time::Duration::from_secs(30 * 60));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(clock.until_midnight(), std::time::Duration::from_secs(24 * 3600));
    }

    #[test]
    fn test_system_clock_is_monotonic_enough() {
        let clock = SystemClock;
        let first = clock.now();
        assert!(clock.now() >= first);
    }
}
