//! Time utilities: parsing HH:MM and timestamps, duration formatting.

use crate::errors::{AppError, AppResult};
use chrono::{Duration, NaiveDateTime, NaiveTime};

/// Storage format for attendance timestamps.
pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

pub fn parse_time_arg(t: &str) -> AppResult<NaiveTime> {
    parse_time(t).ok_or_else(|| AppError::InvalidTime(t.to_string()))
}

/// Accepts `YYYY-MM-DD HH:MM[:SS]` with a space or a `T` separator.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    let s = s.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

pub fn parse_timestamp_arg(s: &str) -> AppResult<NaiveDateTime> {
    parse_timestamp(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))
}

pub fn parse_optional_timestamp(input: Option<&String>) -> AppResult<Option<NaiveDateTime>> {
    input.map(|s| parse_timestamp_arg(s)).transpose()
}

pub fn format_ts(ts: &NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

pub fn format_optional_ts(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

/// Grace period as a duration, clamped to `0..=MAX_GRACE_MINUTES`.
pub fn grace_duration(minutes: i64) -> Duration {
    Duration::minutes(minutes.clamp(0, crate::core::classifier::MAX_GRACE_MINUTES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_formats() {
        let a = parse_timestamp("2025-03-10 09:15").unwrap();
        let b = parse_timestamp("2025-03-10T09:15:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(format_ts(&a), "2025-03-10 09:15:00");
        assert!(parse_timestamp("10/03/2025 09:15").is_none());
    }

    #[test]
    fn grace_is_clamped() {
        assert_eq!(grace_duration(-5), Duration::zero());
        assert_eq!(grace_duration(i64::MAX), Duration::days(1));
    }
}
