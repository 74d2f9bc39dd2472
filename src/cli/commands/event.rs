use crate::cli::commands::open_db;
use crate::cli::parser::EventCommands;
use crate::config::Config;
use crate::core::admin::AdminLogic;
use crate::db::queries::list_events;
use crate::errors::AppResult;
use crate::export::range::parse_range;
use crate::ui::messages::{success, warning};
use crate::utils::date::parse_date_arg;
use crate::utils::table::Table;
use crate::utils::time::parse_time_arg;

pub fn handle(action: &EventCommands, cfg: &Config) -> AppResult<()> {
    let mut pool = open_db(cfg)?;

    match action {
        EventCommands::Add {
            name,
            location,
            date,
            start,
            end,
        } => {
            let date = parse_date_arg(date)?;
            let start = parse_time_arg(start)?;
            let end = parse_time_arg(end)?;

            let location = if location.trim().is_empty() {
                cfg.default_location.clone()
            } else {
                location.trim().to_string()
            };

            let ev = AdminLogic::add_event(&mut pool, name.trim(), &location, date, start, end)?;
            success(format!(
                "Event #{} '{}' scheduled on {} ({})",
                ev.id,
                ev.name,
                ev.date_str(),
                ev.span_str()
            ));
        }

        EventCommands::List { period } => {
            let bounds = match period {
                Some(p) if !p.eq_ignore_ascii_case("all") => Some(parse_range(p)?),
                _ => None,
            };

            let events = list_events(&pool.conn, bounds)?;
            if events.is_empty() {
                warning("No events found.");
                return Ok(());
            }

            let mut table = Table::new(&["ID", "DATE", "TIME", "NAME", "LOCATION"]);
            for ev in &events {
                table.add_row(vec![
                    ev.id.to_string(),
                    ev.date_str(),
                    ev.span_str(),
                    ev.name.clone(),
                    ev.location.clone(),
                ]);
            }
            println!("{}", table.render());
        }
    }

    Ok(())
}
