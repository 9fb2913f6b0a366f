//! Clock port - source of wall-clock time.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};

/// Wall-clock time in the gateway's local offset.
///
/// Injected so cache expiry and date-scoped keys can be driven
/// deterministically.
pub trait Clock: Send + Sync {
    /// Current local time.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Current local calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Time remaining until the next local midnight.
    fn until_midnight(&self) -> std::time::Duration {
        let now = self.now();
        let next_midnight = now
            .date_naive()
            .succ_opt()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .and_then(|midnight| midnight.and_local_timezone(*now.offset()).single());

        next_midnight
            .map(|midnight| midnight - now)
            .and_then(|remaining| remaining.max(Duration::zero()).to_std().ok())
            .unwrap_or_default()
    }
}
