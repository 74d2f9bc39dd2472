use crate::db::migrate::{pending_count, run_pending_migrations};
use crate::errors::AppResult;
use rusqlite::Connection;

/// Bring a fresh or existing store up to the current schema. Returns how
/// many migrations were applied.
pub fn init_db(conn: &Connection) -> AppResult<usize> {
    let pending = pending_count(conn)?;
    run_pending_migrations(conn)?;
    Ok(pending)
}
