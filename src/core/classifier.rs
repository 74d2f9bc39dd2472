//! Attendance status classification.
//!
//! The status is not a single decision tree: a base status is derived from
//! the check-in/check-out pair and then independent corrections are layered
//! on top of it. The function is pure; a closed record (check-in and
//! check-out both set) never depends on the evaluation time.

use crate::errors::{AppError, AppResult};
use crate::models::attendance_status::AttendanceStatus;
use crate::models::window::EventWindow;
use crate::utils::time::format_ts;
use chrono::{Duration, NaiveDateTime};

pub const DEFAULT_GRACE_MINUTES: i64 = 15;
/// Upper bound for a configured grace period (one day).
pub const MAX_GRACE_MINUTES: i64 = 24 * 60;

/// Compute the attendance status of one (student, event) pair.
///
/// Rules, in priority order:
/// 1. no check-in → `absent` (once the event has ended; see below);
/// 2. closed before the scheduled end → `left early`;
/// 3. closed at/after the scheduled end → `present`, clearing any late flag;
/// 4. still open, checked in after `start + grace` and not after the end → `late`;
/// 5. attended interval < half the scheduled duration while `present` → `partial`;
/// 6. otherwise `present`.
///
/// Without a check-in the student has not been seen, so the result is
/// `absent` regardless of `eval_time`, before the end as well as after it.
/// A caller that wants a "not arrived yet" view while the event is running
/// must test `check_in.is_none() && eval_time < window.end()` itself.
pub fn classify(
    window: &EventWindow,
    check_in: Option<NaiveDateTime>,
    check_out: Option<NaiveDateTime>,
    eval_time: NaiveDateTime,
    grace: Duration,
) -> AppResult<AttendanceStatus> {
    log::trace!("classify at {}", format_ts(&eval_time));

    let Some(check_in) = check_in else {
        if let Some(out) = check_out {
            return Err(AppError::InvalidTimestamp(format!(
                "check-out {} recorded without a check-in",
                format_ts(&out)
            )));
        }
        // rule 1, and "not seen yet" before the end
        return Ok(AttendanceStatus::Absent);
    };

    if let Some(out) = check_out
        && out < check_in
    {
        return Err(AppError::InvalidTimestamp(format!(
            "check-out {} is before check-in {}",
            format_ts(&out),
            format_ts(&check_in)
        )));
    }

    let mut status = match check_out {
        // rule 2: duration never suppresses an early departure
        Some(out) if out < window.end() => AttendanceStatus::LeftEarly,
        // rule 3
        Some(_) => AttendanceStatus::Present,
        // rule 4
        None if window.is_late_arrival(check_in, grace) => AttendanceStatus::Late,
        // rule 6
        None => AttendanceStatus::Present,
    };

    // rule 5
    if status == AttendanceStatus::Present {
        let attended = check_out.unwrap_or(window.end()) - check_in;
        if window.is_partial(attended) {
            status = AttendanceStatus::Partial;
        }
    }

    Ok(status)
}

/// Convenience wrapper taking raw start/end instants; fails with
/// `InvalidWindow` when start ≥ end.
pub fn classify_raw(
    start: NaiveDateTime,
    end: NaiveDateTime,
    check_in: Option<NaiveDateTime>,
    check_out: Option<NaiveDateTime>,
    eval_time: NaiveDateTime,
    grace: Duration,
) -> AppResult<AttendanceStatus> {
    let window = EventWindow::new(start, end)?;
    classify(&window, check_in, check_out, eval_time, grace)
}
