use crate::errors::AppResult;
use chrono::Local;
use rusqlite::{Connection, Row, params};

/// One row of the internal `log` table.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            operation: row.get("operation")?,
            target: row.get::<_, Option<String>>("target")?.unwrap_or_default(),
            message: row.get("message")?,
        })
    }
}

/// Append an audit line. Runs on whatever connection or transaction it is
/// given, so the line commits or rolls back with the change it describes.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message) VALUES (?1, ?2, ?3, ?4)",
    )?
    .execute(params![Local::now().to_rfc3339(), operation, target, message])?;

    ::log::debug!("audit {operation} [{target}] {message}");
    Ok(())
}

/// The whole audit log, oldest first.
pub fn load_log(conn: &Connection) -> AppResult<Vec<LogEntry>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM log ORDER BY id ASC")?;
    let entries = stmt
        .query_map([], LogEntry::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}
