use crate::db::pool::DbPool;
use crate::db::queries::{list_events, load_roster, require_event};
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::AttendanceExport;
use crate::export::range::parse_range;
use crate::export::xlsx::export_xlsx;
use crate::ui::messages::warning;
use chrono::NaiveDate;
use std::path::Path;

/// High-level export of attendance rosters.
pub struct ExportLogic;

impl ExportLogic {
    /// Export attendance rows.
    ///
    /// - `file`: absolute path of the output file
    /// - `event_id`: a single event; takes precedence over `range`
    /// - `range`: `None`, `"all"`, or `YYYY`, `YYYY-MM`, `YYYY-MM-DD` and
    ///   the `A:B` intervals of the same shapes
    ///
    /// Returns the number of rows written.
    pub fn export(
        pool: &mut DbPool,
        format: ExportFormat,
        file: &str,
        range: &Option<String>,
        event_id: Option<i64>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        let rows = Self::collect(pool, range, event_id)?;

        if rows.is_empty() {
            warning("⚠️  No attendance rows found for the selection.");
            return Ok(0);
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
            ExportFormat::Xlsx => export_xlsx(&rows, path)?,
        }

        Ok(rows.len())
    }

    /// Roster rows for one event or every event in the range.
    pub fn collect(
        pool: &mut DbPool,
        range: &Option<String>,
        event_id: Option<i64>,
    ) -> AppResult<Vec<AttendanceExport>> {
        let events = match event_id {
            Some(id) => vec![require_event(&pool.conn, id)?],
            None => {
                let bounds: Option<(NaiveDate, NaiveDate)> = match range {
                    None => None,
                    Some(r) if r.eq_ignore_ascii_case("all") => None,
                    Some(r) => Some(parse_range(r)?),
                };
                list_events(&pool.conn, bounds)?
            }
        };

        let mut rows = Vec::new();
        for ev in &events {
            for entry in load_roster(&pool.conn, ev.id)? {
                rows.push(AttendanceExport::from_roster(ev, &entry));
            }
        }
        Ok(rows)
    }
}
