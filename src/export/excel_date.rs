use crate::utils::time::TS_FORMAT;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const SECS_PER_DAY: f64 = 86_400.0;

/// Days since the Excel epoch (1899-12-30), fractional part = time of day.
fn excel_serial(dt: NaiveDateTime) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN);
    (dt - epoch).num_seconds() as f64 / SECS_PER_DAY
}

/// Export columns hold stored timestamps, event dates and `HH:MM` times.
/// Returns the Excel number format and serial value for those shapes.
pub(crate) fn parse_to_excel_date(s: &str) -> Option<(&'static str, f64)> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, TS_FORMAT) {
        return Some(("yyyy-mm-dd hh:mm:ss", excel_serial(dt)));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(("yyyy-mm-dd", excel_serial(d.and_time(NaiveTime::MIN))));
    }
    if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M") {
        return Some(("hh:mm", t.num_seconds_from_midnight() as f64 / SECS_PER_DAY));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendance_timestamps_become_serials() {
        let (fmt, serial) = parse_to_excel_date("2025-03-10 12:00:00").unwrap();
        assert_eq!(fmt, "yyyy-mm-dd hh:mm:ss");
        // 2025-03-10 is serial 45726, noon is half a day
        assert!((serial - 45726.5).abs() < 1e-9);

        let (fmt, serial) = parse_to_excel_date("09:00").unwrap();
        assert_eq!(fmt, "hh:mm");
        assert!((serial - 0.375).abs() < 1e-9);

        assert!(parse_to_excel_date("S-1001").is_none());
    }
}
