//! Schema migrations. Each step is idempotent and recorded in the `log`
//! table as `migration_applied`, so reruns are no-ops.

use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension};

/// Ensure that the `log` table exists. Migrations are tracked in it, so it
/// must come first.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

const CREATE_CORE_TABLES: &str = r#"
    CREATE TABLE IF NOT EXISTS students (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        number      TEXT NOT NULL UNIQUE,
        name        TEXT NOT NULL,
        created_at  TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS events (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL,
        location    TEXT NOT NULL DEFAULT '',
        date        TEXT NOT NULL,
        start_time  TEXT NOT NULL,
        end_time    TEXT NOT NULL,
        created_at  TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_events_date ON events(date, start_time);
"#;

const CREATE_ATTENDANCE_TABLES: &str = r#"
    CREATE TABLE IF NOT EXISTS registrations (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        student_id  INTEGER NOT NULL REFERENCES students(id),
        event_id    INTEGER NOT NULL REFERENCES events(id),
        source      TEXT NOT NULL DEFAULT 'manual' CHECK(source IN ('manual','scan')),
        created_at  TEXT NOT NULL,
        UNIQUE(student_id, event_id)
    );

    CREATE TABLE IF NOT EXISTS attendance (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        student_id  INTEGER NOT NULL REFERENCES students(id),
        event_id    INTEGER NOT NULL REFERENCES events(id),
        check_in    TEXT,
        check_out   TEXT,
        status      TEXT CHECK(status IS NULL OR status IN ('present','late','left early','partial','absent')),
        updated_at  TEXT NOT NULL,
        UNIQUE(student_id, event_id)
    );

    CREATE INDEX IF NOT EXISTS idx_registrations_event ON registrations(event_id);
    CREATE INDEX IF NOT EXISTS idx_attendance_event ON attendance(event_id, status);
"#;

/// Ordered list of (version, description, sql).
const MIGRATIONS: [(&str, &str, &str); 2] = [
    (
        "20250301_0001_core_tables",
        "Created students and events tables",
        CREATE_CORE_TABLES,
    ),
    (
        "20250301_0002_attendance_tables",
        "Created registrations and attendance tables",
        CREATE_ATTENDANCE_TABLES,
    ),
];

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for (version, message, sql) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)
            .map_err(|e| AppError::Migration(format!("{version}: {e}")))?;
        mark_applied(&tx, version, message)?;
        tx.commit()?;

        success(format!("Migration applied: {} → {}", version, message));
    }

    Ok(())
}

/// Number of migrations not yet recorded as applied.
pub fn pending_count(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;
    let mut n = 0;
    for (version, _, _) in MIGRATIONS {
        if !is_applied(conn, version)? {
            n += 1;
        }
    }
    Ok(n)
}
