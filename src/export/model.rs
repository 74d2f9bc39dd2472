use crate::db::queries::RosterEntry;
use crate::models::event::Event;
use crate::utils::time::format_ts;
use serde::Serialize;

/// Flat attendance row, one per (event, student) on the roster.
#[derive(Serialize, Clone, Debug)]
pub struct AttendanceExport {
    pub event_id: i64,
    pub event_name: String,
    pub event_date: String,
    pub event_start: String,
    pub event_end: String,
    pub student_number: String,
    pub student_name: String,
    pub registered: bool,
    pub check_in: String,
    pub check_out: String,
    pub status: String,
}

impl AttendanceExport {
    pub fn from_roster(event: &Event, entry: &RosterEntry) -> Self {
        let rec = entry.record.as_ref();
        Self {
            event_id: event.id,
            event_name: event.name.clone(),
            event_date: event.date_str(),
            event_start: event.start_time.format("%H:%M").to_string(),
            event_end: event.end_time.format("%H:%M").to_string(),
            student_number: entry.student_number.clone(),
            student_name: entry.student_name.clone(),
            registered: entry.registered,
            check_in: rec
                .and_then(|r| r.check_in.as_ref())
                .map(format_ts)
                .unwrap_or_default(),
            check_out: rec
                .and_then(|r| r.check_out.as_ref())
                .map(format_ts)
                .unwrap_or_default(),
            status: rec
                .and_then(|r| r.status)
                .map(|s| s.to_db_str().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Header for CSV / XLSX
pub(crate) fn get_headers() -> Vec<&'static str> {
    vec![
        "event_id",
        "event_name",
        "event_date",
        "event_start",
        "event_end",
        "student_number",
        "student_name",
        "registered",
        "check_in",
        "check_out",
        "status",
    ]
}

pub(crate) fn attendance_to_row(e: &AttendanceExport) -> Vec<String> {
    vec![
        e.event_id.to_string(),
        e.event_name.clone(),
        e.event_date.clone(),
        e.event_start.clone(),
        e.event_end.clone(),
        e.student_number.clone(),
        e.student_name.clone(),
        if e.registered { "yes" } else { "no" }.to_string(),
        e.check_in.clone(),
        e.check_out.clone(),
        e.status.clone(),
    ]
}
