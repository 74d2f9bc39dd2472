use crate::errors::{AppError, AppResult};
use crate::export::excel_date::parse_to_excel_date;
use crate::export::model::{attendance_to_row, get_headers};
use crate::export::{AttendanceExport, notify_export_success};
use crate::models::attendance_status::AttendanceStatus;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const HEADER_BG: u32 = 0x2F75B5;

fn xlsx_err(e: XlsxError) -> AppError {
    AppError::Export(format!("xlsx: {e}"))
}

/// Cell fill for the status column, so a printed roster reads at a glance.
fn status_fill(value: &str) -> Option<Color> {
    let rgb = match AttendanceStatus::from_db_str(value)? {
        AttendanceStatus::Present => 0xE2EFDA,
        AttendanceStatus::Late => 0xFFF2CC,
        AttendanceStatus::LeftEarly => 0xFCE4D6,
        AttendanceStatus::Partial => 0xE4DFEC,
        AttendanceStatus::Absent => 0xF8CBAD,
    };
    Some(Color::RGB(rgb))
}

/// One sheet, header row frozen, autofilter over the whole roster.
pub(crate) fn export_xlsx(rows: &[AttendanceExport], path: &Path) -> AppResult<()> {
    let headers = get_headers();
    let status_col = headers.iter().position(|h| *h == "status");
    let last_col = (headers.len() - 1) as u16;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Attendance").map_err(xlsx_err)?;

    let header_fmt = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_BG))
        .set_border(FormatBorder::Thin);

    for (col, h) in headers.iter().enumerate() {
        sheet
            .write_with_format(0, col as u16, *h, &header_fmt)
            .map_err(xlsx_err)?;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();

    for (i, item) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in attendance_to_row(item).iter().enumerate() {
            let mut fmt = Format::new().set_border(FormatBorder::Thin);
            if Some(col) == status_col
                && let Some(fill) = status_fill(value)
            {
                fmt = fmt.set_background_color(fill);
            }
            write_cell(sheet, row, col as u16, value, fmt)?;
            widths[col] = widths[col].max(value.width());
        }
    }

    sheet
        .autofilter(0, 0, rows.len() as u32, last_col)
        .map_err(xlsx_err)?;
    sheet.set_freeze_panes(1, 0).map_err(xlsx_err)?;
    for (col, w) in widths.iter().enumerate() {
        sheet
            .set_column_width(col as u16, (*w + 2) as f64)
            .map_err(xlsx_err)?;
    }

    workbook.save(path).map_err(xlsx_err)?;

    notify_export_success("XLSX", path);
    Ok(())
}

/// Timestamps, dates and times become Excel serials; everything else,
/// student numbers included, is written as text.
fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, value: &str, fmt: Format) -> AppResult<()> {
    match parse_to_excel_date(value) {
        Some((num_format, serial)) => {
            sheet
                .write_with_format(row, col, serial, &fmt.set_num_format(num_format))
                .map_err(xlsx_err)?;
        }
        None if col == 0 => {
            let id: f64 = value.parse().unwrap_or_default();
            sheet.write_with_format(row, col, id, &fmt).map_err(xlsx_err)?;
        }
        None => {
            sheet.write_with_format(row, col, value, &fmt).map_err(xlsx_err)?;
        }
    }
    Ok(())
}
