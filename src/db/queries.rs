use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceRecord;
use crate::models::attendance_status::AttendanceStatus;
use crate::models::event::Event;
use crate::models::registration::{Registration, RegistrationSource};
use crate::models::student::Student;
use crate::utils::time::{TS_FORMAT, format_ts};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn get_ts(row: &Row, col: &str) -> Result<Option<NaiveDateTime>> {
    let raw: Option<String> = row.get(col)?;
    match raw {
        None => Ok(None),
        Some(s) => NaiveDateTime::parse_from_str(&s, TS_FORMAT)
            .map(Some)
            .map_err(|_| conversion_error(0, AppError::InvalidTime(s.clone()))),
    }
}

fn get_status(row: &Row, col: &str) -> Result<Option<AttendanceStatus>> {
    let raw: Option<String> = row.get(col)?;
    match raw {
        None => Ok(None),
        Some(s) => AttendanceStatus::from_db_str(&s)
            .map(Some)
            .ok_or_else(|| conversion_error(0, AppError::InvalidStatus(s.clone()))),
    }
}

fn now_str() -> String {
    Local::now().to_rfc3339()
}

// ---------------------------
// Events
// ---------------------------

pub fn map_event_row(row: &Row) -> Result<Event> {
    let date_str: String = row.get("date")?;
    let start_str: String = row.get("start_time")?;
    let end_str: String = row.get("end_time")?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(0, AppError::InvalidDate(date_str.clone())))?;
    let start_time = NaiveTime::parse_from_str(&start_str, "%H:%M")
        .map_err(|_| conversion_error(0, AppError::InvalidTime(start_str.clone())))?;
    let end_time = NaiveTime::parse_from_str(&end_str, "%H:%M")
        .map_err(|_| conversion_error(0, AppError::InvalidTime(end_str.clone())))?;

    Ok(Event {
        id: row.get("id")?,
        name: row.get("name")?,
        location: row.get("location")?,
        date,
        start_time,
        end_time,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_event(conn: &Connection, ev: &Event) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO events (name, location, date, start_time, end_time, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            ev.name,
            ev.location,
            ev.date.format("%Y-%m-%d").to_string(),
            ev.start_time.format("%H:%M").to_string(),
            ev.end_time.format("%H:%M").to_string(),
            ev.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_event(conn: &Connection, id: i64) -> AppResult<Option<Event>> {
    let ev = conn
        .query_row("SELECT * FROM events WHERE id = ?1", [id], map_event_row)
        .optional()?;
    Ok(ev)
}

pub fn event_exists(conn: &Connection, id: i64) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM events WHERE id = ?1")?;
    Ok(stmt.exists([id])?)
}

pub fn require_event(conn: &Connection, id: i64) -> AppResult<Event> {
    get_event(conn, id)?.ok_or_else(|| AppError::RecordNotFound(format!("event {id}")))
}

/// Events in a date range (inclusive), or all events.
pub fn list_events(
    conn: &Connection,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<Event>> {
    let (from, to) = match bounds {
        Some((a, b)) => (a.format("%Y-%m-%d").to_string(), b.format("%Y-%m-%d").to_string()),
        None => ("0000-01-01".to_string(), "9999-12-31".to_string()),
    };

    let mut stmt = conn.prepare(
        "SELECT * FROM events
         WHERE date BETWEEN ?1 AND ?2
         ORDER BY date ASC, start_time ASC, id ASC",
    )?;
    let rows = stmt.query_map(params![from, to], map_event_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Ids of events whose scheduled end is at or before `as_of`.
///
/// Only ids are returned: rows are decoded one by one by the caller so a
/// single malformed event cannot hide the others.
pub fn ended_event_ids(conn: &Connection, as_of: &NaiveDateTime) -> AppResult<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT id FROM events
         WHERE date || ' ' || end_time || ':00' <= ?1
         ORDER BY date ASC, end_time ASC, id ASC",
    )?;
    let rows = stmt.query_map([format_ts(as_of)], |row| row.get::<_, i64>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// Students
// ---------------------------

fn map_student_row(row: &Row) -> Result<Student> {
    Ok(Student {
        id: row.get("id")?,
        number: row.get("number")?,
        name: row.get("name")?,
    })
}

pub fn insert_student(conn: &Connection, number: &str, name: &str) -> AppResult<i64> {
    let inserted = conn.execute(
        "INSERT INTO students (number, name, created_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(number) DO NOTHING",
        params![number.trim(), name.trim(), now_str()],
    )?;

    if inserted == 0 {
        return Err(AppError::DuplicateRecord(format!(
            "student number {} already exists",
            number.trim()
        )));
    }
    Ok(conn.last_insert_rowid())
}

pub fn find_student_by_number(conn: &Connection, number: &str) -> AppResult<Option<Student>> {
    let s = conn
        .query_row(
            "SELECT id, number, name FROM students WHERE number = ?1",
            [number.trim()],
            map_student_row,
        )
        .optional()?;
    Ok(s)
}

pub fn require_student(conn: &Connection, number: &str) -> AppResult<Student> {
    find_student_by_number(conn, number)?
        .ok_or_else(|| AppError::RecordNotFound(format!("student {}", number.trim())))
}

// ---------------------------
// Registrations
// ---------------------------

/// Insert-or-ignore. Returns true when a new registration was created.
pub fn register(
    conn: &Connection,
    student_id: i64,
    event_id: i64,
    source: RegistrationSource,
) -> AppResult<bool> {
    let inserted = conn.execute(
        "INSERT INTO registrations (student_id, event_id, source, created_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(student_id, event_id) DO NOTHING",
        params![student_id, event_id, source.to_db_str(), now_str()],
    )?;
    Ok(inserted == 1)
}

pub fn list_registrations(conn: &Connection, event_id: i64) -> AppResult<Vec<Registration>> {
    let mut stmt = conn.prepare(
        "SELECT id, student_id, event_id, source, created_at
         FROM registrations WHERE event_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([event_id], |row| {
        let source: String = row.get("source")?;
        Ok(Registration {
            id: row.get("id")?,
            student_id: row.get("student_id")?,
            event_id: row.get("event_id")?,
            source: RegistrationSource::from_db_str(&source)
                .ok_or_else(|| conversion_error(3, AppError::Other(source.clone())))?,
            created_at: row.get("created_at")?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// Attendance
// ---------------------------

pub fn map_attendance_row(row: &Row) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
        id: row.get("id")?,
        student_id: row.get("student_id")?,
        event_id: row.get("event_id")?,
        check_in: get_ts(row, "check_in")?,
        check_out: get_ts(row, "check_out")?,
        status: get_status(row, "status")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn get_attendance(
    conn: &Connection,
    student_id: i64,
    event_id: i64,
) -> AppResult<Option<AttendanceRecord>> {
    let rec = conn
        .query_row(
            "SELECT * FROM attendance WHERE student_id = ?1 AND event_id = ?2",
            params![student_id, event_id],
            map_attendance_row,
        )
        .optional()?;
    Ok(rec)
}

pub fn list_attendance(conn: &Connection, event_id: i64) -> AppResult<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare("SELECT * FROM attendance WHERE event_id = ?1 ORDER BY id ASC")?;
    let rows = stmt.query_map([event_id], map_attendance_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Atomic insert for a (student, event) pair. A row that already exists is
/// left untouched and reported as `DuplicateRecord`.
pub fn insert_attendance(conn: &Connection, rec: &AttendanceRecord) -> AppResult<i64> {
    let inserted = conn.execute(
        "INSERT INTO attendance (student_id, event_id, check_in, check_out, status, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(student_id, event_id) DO NOTHING",
        params![
            rec.student_id,
            rec.event_id,
            rec.check_in.as_ref().map(format_ts),
            rec.check_out.as_ref().map(format_ts),
            rec.status.map(|s| s.to_db_str()),
            now_str(),
        ],
    )?;

    if inserted == 0 {
        return Err(AppError::DuplicateRecord(format!(
            "attendance for student {} at event {}",
            rec.student_id, rec.event_id
        )));
    }
    Ok(conn.last_insert_rowid())
}

/// Overwrite timestamps and status of an existing row.
pub fn update_attendance(conn: &Connection, rec: &AttendanceRecord) -> AppResult<()> {
    let updated = conn.execute(
        "UPDATE attendance
         SET check_in = ?1, check_out = ?2, status = ?3, updated_at = ?4
         WHERE id = ?5",
        params![
            rec.check_in.as_ref().map(format_ts),
            rec.check_out.as_ref().map(format_ts),
            rec.status.map(|s| s.to_db_str()),
            now_str(),
            rec.id,
        ],
    )?;

    if updated == 0 {
        return Err(AppError::RecordNotFound(format!("attendance {}", rec.id)));
    }
    Ok(())
}

pub fn update_status(conn: &Connection, id: i64, status: AttendanceStatus) -> AppResult<()> {
    let updated = conn.execute(
        "UPDATE attendance SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.to_db_str(), now_str(), id],
    )?;

    if updated == 0 {
        return Err(AppError::RecordNotFound(format!("attendance {id}")));
    }
    Ok(())
}

/// Insert an `absent` row, stamped with `marked_at` as check-in, for every
/// registered student of the event that has no attendance row yet.
pub fn insert_missing_absent(
    conn: &Connection,
    event_id: i64,
    marked_at: &NaiveDateTime,
) -> AppResult<usize> {
    let inserted = conn.execute(
        "INSERT INTO attendance (student_id, event_id, check_in, check_out, status, updated_at)
         SELECT r.student_id, r.event_id, ?2, NULL, ?3, ?4
         FROM registrations r
         WHERE r.event_id = ?1
           AND NOT EXISTS (
               SELECT 1 FROM attendance a
               WHERE a.student_id = r.student_id AND a.event_id = r.event_id
           )
         ON CONFLICT(student_id, event_id) DO NOTHING",
        params![
            event_id,
            format_ts(marked_at),
            AttendanceStatus::Absent.to_db_str(),
            now_str(),
        ],
    )?;
    Ok(inserted)
}

// ---------------------------
// Roster (registrations ∪ attendance, joined with students)
// ---------------------------

#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub event_id: i64,
    pub student_number: String,
    pub student_name: String,
    pub registered: bool,
    pub record: Option<AttendanceRecord>,
}

pub fn load_roster(conn: &Connection, event_id: i64) -> AppResult<Vec<RosterEntry>> {
    let mut stmt = conn.prepare(
        "SELECT s.id AS sid, s.number, s.name,
                EXISTS (SELECT 1 FROM registrations r
                        WHERE r.student_id = s.id AND r.event_id = ?1) AS registered,
                a.id, a.student_id, a.event_id, a.check_in, a.check_out, a.status, a.updated_at
         FROM students s
         LEFT JOIN attendance a ON a.student_id = s.id AND a.event_id = ?1
         WHERE s.id IN (
             SELECT student_id FROM registrations WHERE event_id = ?1
             UNION
             SELECT student_id FROM attendance WHERE event_id = ?1
         )
         ORDER BY s.number ASC",
    )?;

    let rows = stmt.query_map([event_id], |row| {
        let record_id: Option<i64> = row.get("id")?;
        let record = match record_id {
            Some(_) => Some(map_attendance_row(row)?),
            None => None,
        };
        Ok(RosterEntry {
            event_id,
            student_number: row.get("number")?,
            student_name: row.get("name")?,
            registered: row.get::<_, i64>("registered")? == 1,
            record,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
