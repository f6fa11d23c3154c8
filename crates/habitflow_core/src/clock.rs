//! Wall-clock and weekday source.
//!
//! # Responsibility
//! - Provide "today" in the user's local calendar, not UTC.
//! - Allow deterministic clocks for tests and embedding hosts.

use crate::model::habit::WeekdayIndex;
use chrono::{Datelike, Local, NaiveDate};

/// Time source consumed by the engine.
pub trait Clock {
    /// Current local calendar day.
    fn today(&self) -> NaiveDate;

    /// Current wall-clock time in Unix epoch milliseconds.
    fn now_millis(&self) -> i64;

    /// Current weekday, `0 = Sunday`.
    fn weekday(&self) -> WeekdayIndex {
        weekday_index(self.today())
    }
}

/// Returns the `0 = Sunday` weekday index for `date`.
pub fn weekday_index(date: NaiveDate) -> WeekdayIndex {
    date.weekday().num_days_from_sunday() as WeekdayIndex
}

/// Clock backed by the operating system's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_millis(&self) -> i64 {
        Local::now().timestamp_millis()
    }
}

/// Clock frozen at a caller-chosen instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    pub today: NaiveDate,
    pub now_millis: i64,
}

impl FixedClock {
    pub fn new(today: NaiveDate, now_millis: i64) -> Self {
        Self { today, now_millis }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now_millis(&self) -> i64 {
        self.now_millis
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::weekday_index;
    use chrono::NaiveDate;

    #[test]
    fn weekday_index_starts_on_sunday() {
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        assert_eq!(weekday_index(sunday), 0);
        assert_eq!(weekday_index(saturday), 6);
    }
}
