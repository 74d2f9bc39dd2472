pub mod backup;
pub mod checkin;
pub mod config;
pub mod db;
pub mod event;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod reconcile;
pub mod register;
pub mod scan;
pub mod status;
pub mod student;

use crate::config::Config;
use crate::core::clock::{Clock, clock_for};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::utils::time::parse_optional_timestamp;
use chrono::NaiveDateTime;
use std::path::Path;

/// Open the configured database. A missing file means `init` was never
/// run, which is reported as an unavailable store rather than silently
/// creating an empty one.
pub(crate) fn open_db(cfg: &Config) -> AppResult<DbPool> {
    if cfg.database != ":memory:" && !Path::new(&cfg.database).exists() {
        return Err(AppError::StoreUnavailable(format!(
            "database {} not found (run `rattendance init` first)",
            cfg.database
        )));
    }
    Ok(DbPool::new(&cfg.database)?)
}

/// `--at` / `--as-of` override, or the system clock.
pub(crate) fn resolve_instant(at: &Option<String>) -> AppResult<NaiveDateTime> {
    let fixed = parse_optional_timestamp(at.as_ref())?;
    Ok(clock_for(fixed).now())
}
