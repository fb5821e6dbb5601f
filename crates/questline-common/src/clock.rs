//! Clock abstraction for calendar-date queries.
//!
//! Streak continuity is decided by calendar-date equality, never by
//! elapsed-hours math, so the only thing the progression core ever asks a
//! clock for is "what calendar day is it". Production callers hand in
//! [`SystemClock`]; tests pin a [`FixedClock`].

use chrono::NaiveDate;

/// Source of the current calendar date.
pub trait Clock {
    /// Returns today as a calendar date.
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Clock pinned to a fixed date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(NaiveDate);

impl FixedClock {
    /// Creates a clock that always reports the given date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
