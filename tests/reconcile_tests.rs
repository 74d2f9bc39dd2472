mod common;
use chrono::Duration;
use common::{at, pool_with_event};
use rattendance::core::admin::AdminLogic;
use rattendance::core::checkin::CheckInLogic;
use rattendance::core::reconcile::{CorrectionStep, ReconcileLogic, plan_corrections};
use rattendance::db::pool::DbPool;
use rattendance::db::queries::{find_student_by_number, list_attendance};
use rattendance::errors::AppError;
use rattendance::models::attendance::AttendanceRecord;
use rattendance::models::attendance_status::AttendanceStatus;
use rattendance::models::window::EventWindow;
use rusqlite::params;

fn grace() -> Duration {
    Duration::minutes(15)
}

fn student_id(pool: &DbPool, number: &str) -> i64 {
    find_student_by_number(&pool.conn, number)
        .unwrap()
        .expect("student exists")
        .id
}

fn status_of(pool: &DbPool, event_id: i64, number: &str) -> Option<AttendanceStatus> {
    let sid = student_id(pool, number);
    list_attendance(&pool.conn, event_id)
        .unwrap()
        .into_iter()
        .find(|r| r.student_id == sid)
        .and_then(|r| r.status)
}

/// S1 registered and never seen, S2 never checked out, S3 late but stayed to
/// the end, S4 left early, S5 a legacy `present` row after the end.
fn seeded() -> (DbPool, i64) {
    let (mut pool, ev) = pool_with_event(5);

    AdminLogic::register(&mut pool, "S1", ev).unwrap();

    CheckInLogic::check_in(&mut pool, "S2", ev, at("09:05:00"), grace()).unwrap();

    CheckInLogic::check_in(&mut pool, "S3", ev, at("09:20:00"), grace()).unwrap();
    CheckInLogic::check_out(&mut pool, "S3", ev, at("11:00:00"), grace()).unwrap();

    CheckInLogic::check_in(&mut pool, "S4", ev, at("09:00:00"), grace()).unwrap();
    CheckInLogic::check_out(&mut pool, "S4", ev, at("10:55:00"), grace()).unwrap();

    let s5 = student_id(&pool, "S5");
    pool.conn
        .execute(
            "INSERT INTO attendance (student_id, event_id, check_in, check_out, status, updated_at)
             VALUES (?1, ?2, '2025-03-10 11:30:00', '2025-03-10 11:40:00', 'present', '')",
            params![s5, ev],
        )
        .unwrap();

    (pool, ev)
}

#[test]
fn reconcile_marks_absent_and_applies_corrections() {
    let (mut pool, ev) = seeded();

    let report = ReconcileLogic::run(&mut pool, at("12:00:00"), None, grace()).unwrap();

    assert_eq!(report.events_processed, 1);
    assert_eq!(report.absent_count, 1);
    assert_eq!(report.late_count, 1);
    assert_eq!(report.early_count, 1);
    assert_eq!(report.partial_count, 1);
    assert!(report.failures.is_empty());

    assert_eq!(status_of(&pool, ev, "S1"), Some(AttendanceStatus::Absent));
    assert_eq!(status_of(&pool, ev, "S2"), Some(AttendanceStatus::LeftEarly));
    assert_eq!(status_of(&pool, ev, "S3"), Some(AttendanceStatus::Late));
    assert_eq!(status_of(&pool, ev, "S4"), Some(AttendanceStatus::LeftEarly));
    assert_eq!(status_of(&pool, ev, "S5"), Some(AttendanceStatus::Partial));
}

#[test]
fn absent_row_is_stamped_with_reconciliation_instant() {
    let (mut pool, ev) = seeded();
    ReconcileLogic::run(&mut pool, at("12:00:00"), Some(ev), grace()).unwrap();

    let s1 = student_id(&pool, "S1");
    let rec = list_attendance(&pool.conn, ev)
        .unwrap()
        .into_iter()
        .find(|r| r.student_id == s1)
        .expect("absent row inserted");

    assert_eq!(rec.check_in, Some(at("12:00:00")));
    assert_eq!(rec.check_out, None);
}

#[test]
fn reconcile_twice_changes_nothing_the_second_time() {
    let (mut pool, ev) = seeded();

    ReconcileLogic::run(&mut pool, at("12:00:00"), None, grace()).unwrap();
    let before = list_attendance(&pool.conn, ev).unwrap();

    let second = ReconcileLogic::run(&mut pool, at("12:00:00"), None, grace()).unwrap();
    let after = list_attendance(&pool.conn, ev).unwrap();

    assert_eq!(second.absent_count, 0);
    assert_eq!(second.late_count, 0);
    assert_eq!(second.early_count, 0);
    assert_eq!(second.partial_count, 0);
    assert_eq!(before, after);
}

#[test]
fn only_events_ended_by_as_of_are_processed() {
    let (mut pool, _ev) = seeded();

    let report = ReconcileLogic::run(&mut pool, at("10:59:59"), None, grace()).unwrap();
    assert_eq!(report.events_processed, 0);

    let report = ReconcileLogic::run(&mut pool, at("11:00:00"), None, grace()).unwrap();
    assert_eq!(report.events_processed, 1);
}

#[test]
fn requested_event_not_ended_is_skipped() {
    let (mut pool, ev) = seeded();

    let report = ReconcileLogic::run(&mut pool, at("10:00:00"), Some(ev), grace()).unwrap();
    assert_eq!(report.events_processed, 0);
    assert!(report.failures.is_empty());
    assert_eq!(status_of(&pool, ev, "S1"), None);
}

#[test]
fn unknown_event_is_record_not_found() {
    let (mut pool, _ev) = seeded();

    let err = ReconcileLogic::run(&mut pool, at("12:00:00"), Some(999), grace()).unwrap_err();
    assert!(matches!(err, AppError::RecordNotFound(_)));
}

#[test]
fn malformed_event_fails_alone_and_batch_continues() {
    let (mut pool, good) = seeded();

    pool.conn
        .execute(
            "INSERT INTO events (name, location, date, start_time, end_time, created_at)
             VALUES ('Broken', '', '2025-03-10', '12:00', '10:00', '')",
            [],
        )
        .unwrap();
    let broken = pool.conn.last_insert_rowid();
    let s1 = student_id(&pool, "S1");
    pool.conn
        .execute(
            "INSERT INTO registrations (student_id, event_id, source, created_at)
             VALUES (?1, ?2, 'manual', '')",
            params![s1, broken],
        )
        .unwrap();

    let report = ReconcileLogic::run(&mut pool, at("12:00:00"), None, grace()).unwrap();

    assert_eq!(report.events_processed, 1);
    assert_eq!(report.events[0].event_id, good);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].event_id, broken);
    assert!(list_attendance(&pool.conn, broken).unwrap().is_empty());
}

#[test]
fn undecodable_row_rolls_back_absent_marking() {
    let (mut pool, ev) = pool_with_event(2);
    AdminLogic::register(&mut pool, "S1", ev).unwrap();

    let s2 = student_id(&pool, "S2");
    pool.conn
        .execute(
            "INSERT INTO attendance (student_id, event_id, check_in, check_out, status, updated_at)
             VALUES (?1, ?2, 'garbage', NULL, NULL, '')",
            params![s2, ev],
        )
        .unwrap();

    let report = ReconcileLogic::run(&mut pool, at("12:00:00"), None, grace()).unwrap();

    assert_eq!(report.events_processed, 0);
    assert_eq!(report.absent_count, 0);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].event_id, ev);

    // step 1 ran before the decode failure; its insert must be gone
    let s1 = student_id(&pool, "S1");
    let s1_rows: i64 = pool
        .conn
        .query_row(
            "SELECT COUNT(*) FROM attendance WHERE event_id = ?1 AND student_id = ?2",
            params![ev, s1],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(s1_rows, 0);

    let audit: i64 = pool
        .conn
        .query_row(
            "SELECT COUNT(*) FROM log WHERE operation = 'reconcile'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(audit, 0);
}

#[test]
fn absent_rows_refuse_later_scans() {
    let (mut pool, ev) = seeded();
    ReconcileLogic::run(&mut pool, at("12:00:00"), None, grace()).unwrap();

    let err = CheckInLogic::scan(&mut pool, "S1", ev, at("12:05:00"), grace()).unwrap_err();
    assert!(matches!(err, AppError::DuplicateRecord(_)));
}

fn record(id: i64, check_in: &str, check_out: Option<&str>, status: Option<AttendanceStatus>) -> AttendanceRecord {
    AttendanceRecord {
        id,
        student_id: id,
        event_id: 1,
        check_in: Some(at(check_in)),
        check_out: check_out.map(at),
        status,
        updated_at: String::new(),
    }
}

#[test]
fn late_promotion_runs_before_unclosed_flag() {
    let window = EventWindow::new(at("09:00:00"), at("11:00:00")).unwrap();
    let records = vec![record(1, "09:20:00", None, Some(AttendanceStatus::Present))];

    let plan = plan_corrections(&window, grace(), &records);

    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].step, CorrectionStep::PromoteLate);
    assert_eq!(plan[0].to, AttendanceStatus::Late);
}

#[test]
fn unset_status_is_only_touched_by_late_promotion() {
    let window = EventWindow::new(at("09:00:00"), at("11:00:00")).unwrap();
    let records = vec![
        record(1, "09:05:00", None, None),
        record(2, "09:30:00", Some("11:00:00"), None),
    ];

    let plan = plan_corrections(&window, grace(), &records);

    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].record_id, 2);
    assert_eq!(plan[0].from, None);
    assert_eq!(plan[0].step, CorrectionStep::PromoteLate);
}
