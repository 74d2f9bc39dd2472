//! Check-in / check-out flow: the caller side of the classifier.
//!
//! A QR scan carries the student number; the first scan of a student at an
//! event checks them in (auto-registering them), the next one checks them
//! out. Every write runs in its own transaction and leaves an audit line.

use crate::core::classifier::classify;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{
    get_attendance, insert_attendance, register, require_event, require_student,
    update_attendance,
};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceRecord;
use crate::models::attendance_status::AttendanceStatus;
use crate::models::event::Event;
use crate::models::registration::RegistrationSource;
use crate::models::student::Student;
use crate::utils::time::format_ts;
use chrono::{Duration, NaiveDateTime};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone)]
pub enum ScanOutcome {
    CheckedIn {
        record: AttendanceRecord,
        auto_registered: bool,
    },
    CheckedOut {
        record: AttendanceRecord,
    },
}

impl ScanOutcome {
    pub fn record(&self) -> &AttendanceRecord {
        match self {
            ScanOutcome::CheckedIn { record, .. } | ScanOutcome::CheckedOut { record } => record,
        }
    }
}

fn audit_target(event: &Event, student: &Student) -> String {
    format!("event:{}/student:{}", event.id, student.number)
}

/// Rows written by reconciliation are closed even though they carry a
/// check-in and no check-out.
fn accepts_check_out(rec: &AttendanceRecord) -> bool {
    rec.is_open() && rec.status != Some(AttendanceStatus::Absent)
}

fn insert_check_in(
    conn: &Connection,
    event: &Event,
    student: &Student,
    at: NaiveDateTime,
    grace: Duration,
) -> AppResult<AttendanceRecord> {
    let window = event.window()?;
    let status = classify(&window, Some(at), None, at, grace)?;

    let mut record = AttendanceRecord {
        id: 0,
        student_id: student.id,
        event_id: event.id,
        check_in: Some(at),
        check_out: None,
        status: Some(status),
        updated_at: String::new(),
    };
    record.id = insert_attendance(conn, &record)?;

    ttlog(
        conn,
        "checkin",
        &audit_target(event, student),
        &format!("{} checked in at {} ({})", student.name, format_ts(&at), status),
    )?;
    info!(
        "student {} checked in to event {} at {} → {}",
        student.number,
        event.id,
        format_ts(&at),
        status
    );

    Ok(record)
}

fn close_record(
    conn: &Connection,
    event: &Event,
    student: &Student,
    mut record: AttendanceRecord,
    at: NaiveDateTime,
    grace: Duration,
) -> AppResult<AttendanceRecord> {
    let window = event.window()?;
    let status = classify(&window, record.check_in, Some(at), at, grace)?;

    record.check_out = Some(at);
    record.status = Some(status);
    update_attendance(conn, &record)?;

    ttlog(
        conn,
        "checkout",
        &audit_target(event, student),
        &format!("{} checked out at {} ({})", student.name, format_ts(&at), status),
    )?;
    info!(
        "student {} checked out of event {} at {} → {}",
        student.number,
        event.id,
        format_ts(&at),
        status
    );

    Ok(record)
}

pub struct CheckInLogic;

impl CheckInLogic {
    /// Handle one QR scan: check in on the first scan, check out on the
    /// second; any further scan is a `DuplicateRecord`.
    pub fn scan(
        pool: &mut DbPool,
        student_number: &str,
        event_id: i64,
        at: NaiveDateTime,
        grace: Duration,
    ) -> AppResult<ScanOutcome> {
        let tx = pool.conn.transaction()?;

        let student = require_student(&tx, student_number)?;
        let event = require_event(&tx, event_id)?;
        let auto_registered = register(&tx, student.id, event.id, RegistrationSource::Scan)?;

        let outcome = match get_attendance(&tx, student.id, event.id)? {
            None => ScanOutcome::CheckedIn {
                record: insert_check_in(&tx, &event, &student, at, grace)?,
                auto_registered,
            },
            Some(rec) if accepts_check_out(&rec) => ScanOutcome::CheckedOut {
                record: close_record(&tx, &event, &student, rec, at, grace)?,
            },
            Some(_) => {
                return Err(AppError::DuplicateRecord(format!(
                    "student {} already has a closed attendance record for event {}",
                    student.number, event.id
                )));
            }
        };

        tx.commit()?;
        Ok(outcome)
    }

    /// Manual check-in from the staff UI. Fails with `DuplicateRecord` when
    /// the pair already has a record.
    pub fn check_in(
        pool: &mut DbPool,
        student_number: &str,
        event_id: i64,
        at: NaiveDateTime,
        grace: Duration,
    ) -> AppResult<AttendanceRecord> {
        let tx = pool.conn.transaction()?;

        let student = require_student(&tx, student_number)?;
        let event = require_event(&tx, event_id)?;
        register(&tx, student.id, event.id, RegistrationSource::Manual)?;
        let record = insert_check_in(&tx, &event, &student, at, grace)?;

        tx.commit()?;
        Ok(record)
    }

    /// Manual checkout. The pair must already have an open record.
    pub fn check_out(
        pool: &mut DbPool,
        student_number: &str,
        event_id: i64,
        at: NaiveDateTime,
        grace: Duration,
    ) -> AppResult<AttendanceRecord> {
        let tx = pool.conn.transaction()?;

        let student = require_student(&tx, student_number)?;
        let event = require_event(&tx, event_id)?;

        let rec = get_attendance(&tx, student.id, event.id)?.ok_or_else(|| {
            AppError::RecordNotFound(format!(
                "attendance for student {} at event {}",
                student.number, event.id
            ))
        })?;

        if !accepts_check_out(&rec) {
            return Err(AppError::DuplicateRecord(format!(
                "student {} is not checked in to event {}",
                student.number, event.id
            )));
        }

        let record = close_record(&tx, &event, &student, rec, at, grace)?;

        tx.commit()?;
        Ok(record)
    }

    /// Live classification at `at` without writing anything.
    pub fn status(
        pool: &mut DbPool,
        student_number: &str,
        event_id: i64,
        at: NaiveDateTime,
        grace: Duration,
    ) -> AppResult<(Option<AttendanceRecord>, AttendanceStatus)> {
        let student = require_student(&pool.conn, student_number)?;
        let event = require_event(&pool.conn, event_id)?;
        let window = event.window()?;

        let rec = get_attendance(&pool.conn, student.id, event.id)?;
        let status = match &rec {
            // job-written absent rows keep their status
            Some(r) if r.status == Some(AttendanceStatus::Absent) => AttendanceStatus::Absent,
            Some(r) => classify(&window, r.check_in, r.check_out, at, grace)?,
            None => classify(&window, None, None, at, grace)?,
        };

        Ok((rec, status))
    }
}
