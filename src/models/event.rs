use super::window::EventWindow;
use crate::errors::AppResult;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: i64,
    pub name: String,           // ⇔ events.name
    pub location: String,       // ⇔ events.location (TEXT, default '')
    pub date: NaiveDate,        // ⇔ events.date (TEXT "YYYY-MM-DD")
    pub start_time: NaiveTime,  // ⇔ events.start_time (TEXT "HH:MM")
    pub end_time: NaiveTime,    // ⇔ events.end_time (TEXT "HH:MM")
    pub created_at: String,     // ⇔ events.created_at (TEXT, ISO8601)
}

impl Event {
    /// Builds an event that is not yet stored (`id = 0`).
    pub fn new(
        name: &str,
        location: &str,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            id: 0,
            name: name.trim().to_string(),
            location: location.trim().to_string(),
            date,
            start_time,
            end_time,
            created_at: Local::now().to_rfc3339(),
        }
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.date.and_time(self.end_time)
    }

    /// Validated scheduled window; fails with `InvalidWindow` on start ≥ end.
    pub fn window(&self) -> AppResult<EventWindow> {
        EventWindow::new(self.starts_at(), self.ends_at())
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn span_str(&self) -> String {
        format!(
            "{} → {}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}
