//! Time source for classification and reconciliation.
//! Everything that needs "now" receives a `Clock`, so tests and `--as-of`
//! runs are deterministic.

use chrono::{Local, NaiveDateTime, Timelike};

pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in campus-local time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        // Stored timestamps have second precision.
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }
}

/// Always returns the injected instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// `FixedClock` when an override is given, the system clock otherwise.
pub fn clock_for(at: Option<NaiveDateTime>) -> Box<dyn Clock> {
    match at {
        Some(t) => Box::new(FixedClock(t)),
        None => Box::new(SystemClock),
    }
}
