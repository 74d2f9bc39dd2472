use crate::errors::{AppError, AppResult};
use crate::export::{AttendanceExport, notify_export_success};
use std::fs;
use std::path::Path;

fn failed(format: &str, e: impl std::fmt::Display) -> AppError {
    AppError::Export(format!("{format}: {e}"))
}

/// Pretty-printed JSON array, one object per roster row.
pub(crate) fn export_json(rows: &[AttendanceExport], path: &Path) -> AppResult<()> {
    let body = serde_json::to_string_pretty(rows).map_err(|e| failed("json", e))?;
    fs::write(path, body)?;

    notify_export_success("JSON", path);
    Ok(())
}

/// CSV with a header row taken from the serde field names.
pub(crate) fn export_csv(rows: &[AttendanceExport], path: &Path) -> AppResult<()> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| failed("csv", e))?;
    for row in rows {
        wtr.serialize(row).map_err(|e| failed("csv", e))?;
    }
    wtr.flush()?;

    notify_export_success("CSV", path);
    Ok(())
}
