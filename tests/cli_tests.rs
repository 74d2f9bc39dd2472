use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_db_with_data, rat, setup_test_db};

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("cli_init");

    rat()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_commands_require_init() {
    let db_path = setup_test_db("cli_requires_init");

    rat()
        .args(["--db", &db_path, "list", "--event", "1"])
        .assert()
        .failure()
        .stderr(contains("rattendance init"));
}

#[test]
fn test_event_add_and_list() {
    let db_path = setup_test_db("cli_event_list");
    init_db_with_data(&db_path);

    rat()
        .args(["--db", &db_path, "event", "list", "--period", "2025-03"])
        .assert()
        .success()
        .stdout(contains("Orientation").and(contains("2025-03-10")));

    rat()
        .args(["--db", &db_path, "event", "list", "--period", "2024"])
        .assert()
        .success()
        .stdout(contains("No events found"));
}

#[test]
fn test_event_add_rejects_inverted_window() {
    let db_path = setup_test_db("cli_event_inverted");
    init_db_with_data(&db_path);

    rat()
        .args([
            "--db", &db_path, "event", "add", "--name", "Backwards", "--date", "2025-03-11",
            "--start", "11:00", "--end", "09:00",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid event window"));
}

#[test]
fn test_duplicate_student_number_fails() {
    let db_path = setup_test_db("cli_student_dup");
    init_db_with_data(&db_path);

    rat()
        .args(["--db", &db_path, "student", "add", "--number", "1001", "--name", "Someone"])
        .assert()
        .failure()
        .stderr(contains("Duplicate record"));
}

#[test]
fn test_scan_toggles_check_in_and_out() {
    let db_path = setup_test_db("cli_scan_toggle");
    init_db_with_data(&db_path);

    rat()
        .args([
            "--db", &db_path, "scan", "--student", "1001", "--event", "1", "--at",
            "2025-03-10 09:05",
        ])
        .assert()
        .success()
        .stdout(contains("auto-registered").and(contains("Checked in")));

    rat()
        .args([
            "--db", &db_path, "scan", "--student", "1001", "--event", "1", "--at",
            "2025-03-10 11:00",
        ])
        .assert()
        .success()
        .stdout(contains("Checked out").and(contains("present")));

    rat()
        .args([
            "--db", &db_path, "scan", "--student", "1001", "--event", "1", "--at",
            "2025-03-10 11:05",
        ])
        .assert()
        .failure()
        .stderr(contains("Duplicate record"));
}

#[test]
fn test_manual_checkout_before_check_in_is_rejected() {
    let db_path = setup_test_db("cli_checkout_before");
    init_db_with_data(&db_path);

    rat()
        .args([
            "--db", &db_path, "checkin", "--student", "1002", "--event", "1", "--at",
            "2025-03-10 10:00",
        ])
        .assert()
        .success();

    rat()
        .args([
            "--db", &db_path, "checkout", "--student", "1002", "--event", "1", "--at",
            "2025-03-10 09:00",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid timestamp"));
}

#[test]
fn test_status_is_late_after_grace() {
    let db_path = setup_test_db("cli_status_late");
    init_db_with_data(&db_path);

    rat()
        .args([
            "--db", &db_path, "scan", "--student", "1002", "--event", "1", "--at",
            "2025-03-10 09:20",
        ])
        .assert()
        .success();

    rat()
        .args([
            "--db", &db_path, "status", "--student", "1002", "--event", "1", "--at",
            "2025-03-10 09:30",
        ])
        .assert()
        .success()
        .stdout(contains("late"));
}

#[test]
fn test_grace_override_on_command_line() {
    let db_path = setup_test_db("cli_grace_override");
    init_db_with_data(&db_path);

    rat()
        .args([
            "--db", &db_path, "--grace", "30", "scan", "--student", "1002", "--event", "1",
            "--at", "2025-03-10 09:20",
        ])
        .assert()
        .success()
        .stdout(contains("present"));

    rat()
        .args([
            "--db", &db_path, "--grace=-1", "status", "--student", "1002", "--event", "1",
        ])
        .assert()
        .failure()
        .stderr(contains("--grace"));

    rat()
        .args([
            "--db", &db_path, "--grace", "100000000000000", "status", "--student", "1002",
            "--event", "1",
        ])
        .assert()
        .failure()
        .stderr(contains("between 0 and 1440"));
}

#[test]
fn test_reconcile_marks_registered_absentee() {
    let db_path = setup_test_db("cli_reconcile");
    init_db_with_data(&db_path);

    rat()
        .args(["--db", &db_path, "register", "--student", "1003", "--event", "1"])
        .assert()
        .success()
        .stdout(contains("registered"));

    rat()
        .args([
            "--db", &db_path, "scan", "--student", "1001", "--event", "1", "--at",
            "2025-03-10 09:05",
        ])
        .assert()
        .success();

    rat()
        .args([
            "--db", &db_path, "reconcile", "--as-of", "2025-03-10 12:00", "--json",
        ])
        .assert()
        .success()
        .stdout(contains("\"absent_count\": 1").and(contains("\"early_count\": 1")));

    rat()
        .args(["--db", &db_path, "list", "--event", "1"])
        .assert()
        .success()
        .stdout(
            contains("Grace Hopper")
                .and(contains("absent"))
                .and(contains("left early")),
        );

    // second pass is a no-op
    rat()
        .args([
            "--db", &db_path, "reconcile", "--as-of", "2025-03-10 12:00", "--json",
        ])
        .assert()
        .success()
        .stdout(contains("\"absent_count\": 0"));

    rat()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("reconcile"));
}

#[test]
fn test_reconcile_unknown_event_fails() {
    let db_path = setup_test_db("cli_reconcile_unknown");
    init_db_with_data(&db_path);

    rat()
        .args([
            "--db", &db_path, "reconcile", "--event", "42", "--as-of", "2025-03-10 12:00",
        ])
        .assert()
        .failure()
        .stderr(contains("Record not found"));
}

#[test]
fn test_db_check_and_info() {
    let db_path = setup_test_db("cli_db_info");
    init_db_with_data(&db_path);

    rat()
        .args(["--db", &db_path, "db", "--check", "--info"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"));
}

#[test]
fn test_backup_writes_copy() {
    let db_path = setup_test_db("cli_backup");
    init_db_with_data(&db_path);
    let out = common::temp_out("cli_backup", "sqlite");

    rat()
        .args(["--db", &db_path, "backup", "--file", &out, "--force"])
        .assert()
        .success()
        .stdout(contains("Backup created"));

    assert!(std::path::Path::new(&out).exists());
}

#[test]
fn test_list_filters_by_status() {
    let db_path = setup_test_db("cli_list_status");
    init_db_with_data(&db_path);

    for (student, at) in [("1001", "2025-03-10 09:05"), ("1002", "2025-03-10 09:40")] {
        rat()
            .args(["--db", &db_path, "scan", "--student", student, "--event", "1", "--at", at])
            .assert()
            .success();
    }

    rat()
        .args(["--db", &db_path, "list", "--event", "1", "--status", "late"])
        .assert()
        .success()
        .stdout(contains("Alan Turing").and(contains("Ada Lovelace").not()));

    rat()
        .args(["--db", &db_path, "list", "--event", "1", "--status", "gone"])
        .assert()
        .failure()
        .stderr(contains("Invalid attendance status"));
}
