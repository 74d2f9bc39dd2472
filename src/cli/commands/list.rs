use crate::cli::commands::open_db;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::queries::{RosterEntry, load_roster, require_event};
use crate::errors::{AppError, AppResult};
use crate::models::attendance_status::AttendanceStatus;
use crate::models::event::Event;
use crate::ui::messages::warning;
use crate::utils::colors::{colorize_in_out, colorize_optional};
use crate::utils::formatting::{bold, describe_status, mins2readable};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { event, status } = cmd {
        let filter = match status {
            Some(s) => Some(
                AttendanceStatus::from_input(s).ok_or_else(|| AppError::InvalidStatus(s.clone()))?,
            ),
            None => None,
        };

        let pool = open_db(cfg)?;

        let ev = require_event(&pool.conn, *event)?;
        let mut roster = load_roster(&pool.conn, ev.id)?;
        if let Some(f) = filter {
            roster.retain(|e| e.record.as_ref().and_then(|r| r.status) == Some(f));
        }

        println!(
            "{} #{} {} · {} {} · {}\n",
            bold("Event"),
            ev.id,
            ev.name,
            ev.date_str(),
            ev.span_str(),
            if ev.location.is_empty() { "-" } else { &ev.location }
        );

        if roster.is_empty() {
            warning("No matching registrations or attendance for this event.");
            return Ok(());
        }

        print_roster(&ev, &roster);
    }
    Ok(())
}

fn hhmm(ts: Option<chrono::NaiveDateTime>) -> String {
    ts.map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

fn print_roster(ev: &Event, roster: &[RosterEntry]) {
    let mut table = Table::new(&["NUMBER", "NAME", "REG", "IN", "OUT", "TIME", "STATUS"]);

    for entry in roster {
        let (check_in, check_out, attended, status) = match &entry.record {
            Some(r) => (
                r.check_in,
                r.check_out,
                r.check_out
                    .zip(r.check_in)
                    .map(|(out, inn)| mins2readable((out - inn).num_minutes()))
                    .unwrap_or_default(),
                r.status,
            ),
            None => (None, None, String::new(), None),
        };

        table.add_row(vec![
            entry.student_number.clone(),
            entry.student_name.clone(),
            if entry.registered { "yes" } else { "no" }.to_string(),
            colorize_in_out(&hhmm(check_in), true),
            colorize_in_out(&hhmm(check_out), false),
            colorize_optional(&attended),
            describe_status(status),
        ]);
    }

    println!("{}", table.render());

    let recorded = roster.iter().filter(|e| e.record.is_some()).count();
    println!(
        "\n{} student(s), {} with an attendance record (event ends {})",
        roster.len(),
        recorded,
        ev.ends_at().format("%H:%M")
    );
}
