//! Minimal data entry so the attendance core has something to work on:
//! events, students and explicit registrations.

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{insert_event, insert_student, register, require_event, require_student};
use crate::errors::AppResult;
use crate::models::event::Event;
use crate::models::registration::RegistrationSource;
use chrono::{NaiveDate, NaiveTime};

pub struct AdminLogic;

impl AdminLogic {
    /// Store a new event. The window is validated first (`InvalidWindow`).
    pub fn add_event(
        pool: &mut DbPool,
        name: &str,
        location: &str,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> AppResult<Event> {
        let mut ev = Event::new(name, location, date, start, end);
        ev.window()?;

        let tx = pool.conn.transaction()?;
        ev.id = insert_event(&tx, &ev)?;
        ttlog(
            &tx,
            "add",
            &format!("event:{}", ev.id),
            &format!("{} on {} {}", ev.name, ev.date_str(), ev.span_str()),
        )?;
        tx.commit()?;

        Ok(ev)
    }

    pub fn add_student(pool: &mut DbPool, number: &str, name: &str) -> AppResult<i64> {
        let tx = pool.conn.transaction()?;
        let id = insert_student(&tx, number, name)?;
        ttlog(&tx, "add", &format!("student:{}", number.trim()), name)?;
        tx.commit()?;
        Ok(id)
    }

    /// Explicit registration. Returns false when it already existed.
    pub fn register(pool: &mut DbPool, student_number: &str, event_id: i64) -> AppResult<bool> {
        let tx = pool.conn.transaction()?;
        let student = require_student(&tx, student_number)?;
        let event = require_event(&tx, event_id)?;

        let created = register(&tx, student.id, event.id, RegistrationSource::Manual)?;
        if created {
            ttlog(
                &tx,
                "register",
                &format!("event:{}/student:{}", event.id, student.number),
                &format!("{} registered for {}", student.name, event.name),
            )?;
        }
        tx.commit()?;
        Ok(created)
    }
}
