use serde::Serialize;
use std::fmt;

/// Closed set of attendance outcomes stored in `attendance.status`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Late,
    LeftEarly,
    Partial,
    Absent,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 5] = [
        AttendanceStatus::Present,
        AttendanceStatus::Late,
        AttendanceStatus::LeftEarly,
        AttendanceStatus::Partial,
        AttendanceStatus::Absent,
    ];

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Late => "late",
            AttendanceStatus::LeftEarly => "left early",
            AttendanceStatus::Partial => "partial",
            AttendanceStatus::Absent => "absent",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "present" => Some(AttendanceStatus::Present),
            "late" => Some(AttendanceStatus::Late),
            "left early" => Some(AttendanceStatus::LeftEarly),
            "partial" => Some(AttendanceStatus::Partial),
            "absent" => Some(AttendanceStatus::Absent),
            _ => None,
        }
    }

    /// Lenient parser for CLI input ("left-early", "LEFT_EARLY", ...).
    pub fn from_input(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        Self::from_db_str(&normalized)
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "✅",
            AttendanceStatus::Late => "⏰",
            AttendanceStatus::LeftEarly => "🚪",
            AttendanceStatus::Partial => "◐",
            AttendanceStatus::Absent => "❌",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_strings_are_stable() {
        for s in AttendanceStatus::ALL {
            assert_eq!(AttendanceStatus::from_db_str(s.to_db_str()), Some(s));
        }
        assert_eq!(AttendanceStatus::LeftEarly.to_db_str(), "left early");
        assert_eq!(AttendanceStatus::from_db_str("Present"), None);
    }

    #[test]
    fn input_parser_accepts_separators() {
        assert_eq!(
            AttendanceStatus::from_input("left-early"),
            Some(AttendanceStatus::LeftEarly)
        );
        assert_eq!(
            AttendanceStatus::from_input(" LEFT_EARLY "),
            Some(AttendanceStatus::LeftEarly)
        );
        assert_eq!(AttendanceStatus::from_input("gone"), None);
    }
}
