#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rattendance::core::admin::AdminLogic;
use rattendance::db::initialize::init_db;
use rattendance::db::pool::DbPool;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rat() -> Command {
    cargo_bin_cmd!("rattendance")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rattendance.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// `2025-03-10 HH:MM:SS`, the day every fixture event runs on.
pub fn at(hms: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("2025-03-10 {hms}"), "%Y-%m-%d %H:%M:%S")
        .expect("fixture timestamp")
}

pub fn hm(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").expect("fixture time")
}

pub fn fixture_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).expect("fixture date")
}

/// Migrated in-memory store.
pub fn memory_pool() -> DbPool {
    let pool = DbPool::in_memory().expect("open in-memory db");
    init_db(&pool.conn).expect("init db");
    pool
}

/// In-memory store with one 09:00–11:00 event (id returned) and students
/// `S1`..`S<n>`.
pub fn pool_with_event(students: usize) -> (DbPool, i64) {
    let mut pool = memory_pool();
    let ev = AdminLogic::add_event(
        &mut pool,
        "Orientation",
        "Aula Magna",
        fixture_day(),
        hm("09:00"),
        hm("11:00"),
    )
    .expect("add event");
    for i in 1..=students {
        AdminLogic::add_student(&mut pool, &format!("S{i}"), &format!("Student {i}"))
            .expect("add student");
    }
    (pool, ev.id)
}

/// Initialize a file DB through the CLI and add one event plus students.
pub fn init_db_with_data(db_path: &str) {
    rat()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    rat()
        .args([
            "--db",
            db_path,
            "event",
            "add",
            "--name",
            "Orientation",
            "--location",
            "Aula Magna",
            "--date",
            "2025-03-10",
            "--start",
            "09:00",
            "--end",
            "11:00",
        ])
        .assert()
        .success();

    for (number, name) in [("1001", "Ada Lovelace"), ("1002", "Alan Turing"), ("1003", "Grace Hopper")] {
        rat()
            .args(["--db", db_path, "student", "add", "--number", number, "--name", name])
            .assert()
            .success();
    }
}
