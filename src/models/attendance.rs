use super::attendance_status::AttendanceStatus;
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// One row of `attendance`: at most one per (student, event).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub id: i64,
    pub student_id: i64,
    pub event_id: i64,
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
    pub status: Option<AttendanceStatus>, // NULL = unset (legacy/imported rows)
    pub updated_at: String,
}

impl AttendanceRecord {
    pub fn is_open(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_none()
    }

    /// Check-in to check-out, or check-in to `fallback_end` while still open.
    pub fn attended(&self, fallback_end: NaiveDateTime) -> Option<Duration> {
        let start = self.check_in?;
        let end = self.check_out.unwrap_or(fallback_end);
        Some(end - start)
    }
}
