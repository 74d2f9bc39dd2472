//! Formatting utilities used for CLI outputs.

use crate::models::attendance_status::AttendanceStatus;
use crate::utils::colors::{GREEN, GREY, MAGENTA, RED, RESET, YELLOW};

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn mins2readable(mins: i64) -> String {
    let abs_m = mins.abs();
    let sign = if mins < 0 { "-" } else { "" };
    format!("{}{:02}h {:02}m", sign, abs_m / 60, abs_m % 60)
}

/// Coloured label for an attendance status (`--` when unset).
pub fn describe_status(status: Option<AttendanceStatus>) -> String {
    let Some(s) = status else {
        return format!("{GREY}--{RESET}");
    };

    let color = match s {
        AttendanceStatus::Present => GREEN,
        AttendanceStatus::Late => YELLOW,
        AttendanceStatus::LeftEarly => MAGENTA,
        AttendanceStatus::Partial => YELLOW,
        AttendanceStatus::Absent => RED,
    };

    format!("{color}{} {}{RESET}", s.icon(), s)
}
