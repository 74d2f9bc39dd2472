//! Post-event reconciliation.
//!
//! For every event whose scheduled end is at or before `as_of`, four
//! corrections run in order inside one transaction:
//!
//! 1. registered students with no attendance row get an `absent` row whose
//!    check-in is the reconciliation instant;
//! 2. `present`/unset rows checked in after `start + grace` (and not after
//!    the end) become `late`;
//! 3. `present` rows never checked out become `left early`;
//! 4. `present` rows that attended less than half the event become `partial`.
//!
//! Each step reads the statuses written by the previous one. Running the
//! job twice with the same `as_of` changes nothing the second time.

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{
    ended_event_ids, event_exists, insert_missing_absent, list_attendance, require_event,
    update_status,
};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceRecord;
use crate::models::attendance_status::AttendanceStatus;
use crate::models::reconcile_report::{EventReconcileSummary, ReconcileReport};
use crate::models::window::EventWindow;
use crate::utils::time::format_ts;
use chrono::{Duration, NaiveDateTime};
use log::{debug, info, warn};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionStep {
    PromoteLate,
    FlagUnclosed,
    Partial,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub record_id: i64,
    pub from: Option<AttendanceStatus>,
    pub to: AttendanceStatus,
    pub step: CorrectionStep,
}

fn correct(
    corrections: &mut Vec<Correction>,
    current: &mut [Option<AttendanceStatus>],
    idx: usize,
    rec: &AttendanceRecord,
    to: AttendanceStatus,
    step: CorrectionStep,
) {
    corrections.push(Correction {
        record_id: rec.id,
        from: current[idx],
        to,
        step,
    });
    current[idx] = Some(to);
}

/// Steps 2–4 over the rows of one event, without touching the store.
pub fn plan_corrections(
    window: &EventWindow,
    grace: Duration,
    records: &[AttendanceRecord],
) -> Vec<Correction> {
    let mut current: Vec<Option<AttendanceStatus>> = records.iter().map(|r| r.status).collect();
    let mut corrections = Vec::new();

    // 2) promote late
    for (i, rec) in records.iter().enumerate() {
        let eligible = matches!(current[i], None | Some(AttendanceStatus::Present));
        if let Some(check_in) = rec.check_in
            && eligible
            && window.is_late_arrival(check_in, grace)
        {
            let step = CorrectionStep::PromoteLate;
            correct(&mut corrections, &mut current, i, rec, AttendanceStatus::Late, step);
        }
    }

    // 3) open rows left without checking out
    for (i, rec) in records.iter().enumerate() {
        if rec.is_open() && current[i] == Some(AttendanceStatus::Present) {
            let step = CorrectionStep::FlagUnclosed;
            correct(&mut corrections, &mut current, i, rec, AttendanceStatus::LeftEarly, step);
        }
    }

    // 4) partial attendance
    for (i, rec) in records.iter().enumerate() {
        if current[i] != Some(AttendanceStatus::Present) {
            continue;
        }
        if let Some(attended) = rec.attended(window.end())
            && window.is_partial(attended)
        {
            let step = CorrectionStep::Partial;
            correct(&mut corrections, &mut current, i, rec, AttendanceStatus::Partial, step);
        }
    }

    corrections
}

pub struct ReconcileLogic;

impl ReconcileLogic {
    /// Reconcile every event ended by `as_of`, or only `event_id`.
    ///
    /// Per-event failures are collected in the report and the batch goes
    /// on; only `StoreUnavailable` aborts it. An unknown `event_id` is
    /// `RecordNotFound`; a known event that has not ended yet is skipped.
    pub fn run(
        pool: &mut DbPool,
        as_of: NaiveDateTime,
        event_id: Option<i64>,
        grace: Duration,
    ) -> AppResult<ReconcileReport> {
        let mut report = ReconcileReport::new(as_of);

        let ids = match event_id {
            Some(id) => {
                if !event_exists(&pool.conn, id)? {
                    return Err(AppError::RecordNotFound(format!("event {id}")));
                }
                let ended: Vec<i64> = ended_event_ids(&pool.conn, &as_of)?
                    .into_iter()
                    .filter(|e| *e == id)
                    .collect();
                if ended.is_empty() {
                    info!("event {id} has not ended at {}, skipped", format_ts(&as_of));
                }
                ended
            }
            None => ended_event_ids(&pool.conn, &as_of)?,
        };

        info!(
            "reconciling {} event(s) as of {}",
            ids.len(),
            format_ts(&as_of)
        );

        for id in ids {
            match reconcile_event(&mut pool.conn, id, as_of, grace) {
                Ok(summary) => {
                    debug!("event {id}: {summary:?}");
                    report.record(summary);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("event {id} not reconciled: {e}");
                    report.fail(id, e.to_string());
                }
            }
        }

        Ok(report)
    }
}

/// One event, all four steps, one transaction. Any error drops the
/// transaction, which rolls back the partial writes.
fn reconcile_event(
    conn: &mut Connection,
    event_id: i64,
    as_of: NaiveDateTime,
    grace: Duration,
) -> AppResult<EventReconcileSummary> {
    let tx = conn.transaction()?;

    let event = require_event(&tx, event_id)?;
    let window = event.window()?;

    let mut summary = EventReconcileSummary {
        event_id,
        event_name: event.name.clone(),
        ..Default::default()
    };

    // 1) mark absent
    summary.absent_count = insert_missing_absent(&tx, event_id, &as_of)?;

    // 2..4) corrections over the rows as they are now
    let records = list_attendance(&tx, event_id)?;
    for c in plan_corrections(&window, grace, &records) {
        update_status(&tx, c.record_id, c.to)?;
        match c.step {
            CorrectionStep::PromoteLate => summary.late_count += 1,
            CorrectionStep::FlagUnclosed => summary.early_count += 1,
            CorrectionStep::Partial => summary.partial_count += 1,
        }
    }

    ttlog(
        &tx,
        "reconcile",
        &format!("event:{event_id}"),
        &format!(
            "as of {}: absent={} late={} left_early={} partial={}",
            format_ts(&as_of),
            summary.absent_count,
            summary.late_count,
            summary.early_count,
            summary.partial_count
        ),
    )?;

    tx.commit()?;
    Ok(summary)
}
