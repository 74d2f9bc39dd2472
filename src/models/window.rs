use crate::errors::{AppError, AppResult};
use crate::utils::time::format_ts;
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// Scheduled start/end of an event. Constructed only through `new`, so a
/// value in hand always satisfies start < end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl EventWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> AppResult<Self> {
        if start >= end {
            return Err(AppError::InvalidWindow {
                start: format_ts(&start),
                end: format_ts(&end),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Last instant at which a check-in still counts as on time; `None`
    /// when it lies beyond the representable calendar.
    pub fn grace_deadline(&self, grace: Duration) -> Option<NaiveDateTime> {
        self.start.checked_add_signed(grace)
    }

    /// Check-in strictly after the grace deadline and no later than the end.
    /// An unrepresentable deadline is never reached.
    pub fn is_late_arrival(&self, check_in: NaiveDateTime, grace: Duration) -> bool {
        match self.grace_deadline(grace) {
            Some(deadline) => check_in > deadline && check_in <= self.end,
            None => false,
        }
    }

    /// Attended interval below half the scheduled duration.
    ///
    /// Compared as `2 * attended < total` so that an odd number of seconds
    /// never rounds an exact half into "partial".
    pub fn is_partial(&self, attended: Duration) -> bool {
        attended * 2 < self.duration()
    }
}
