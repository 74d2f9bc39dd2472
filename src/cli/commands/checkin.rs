use crate::cli::commands::{open_db, resolve_instant};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::checkin::CheckInLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::formatting::describe_status;
use crate::utils::time::format_optional_ts;

/// Manual `checkin` and `checkout`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Checkin { student, event, at } => {
            let at = resolve_instant(at)?;
            let mut pool = open_db(cfg)?;

            let rec = CheckInLogic::check_in(&mut pool, student, *event, at, cfg.grace_period())?;
            success(format!(
                "Checked in {} at {} → {}",
                student,
                format_optional_ts(rec.check_in),
                describe_status(rec.status)
            ));
        }
        Commands::Checkout { student, event, at } => {
            let at = resolve_instant(at)?;
            let mut pool = open_db(cfg)?;

            let rec = CheckInLogic::check_out(&mut pool, student, *event, at, cfg.grace_period())?;
            success(format!(
                "Checked out {} ({} → {}) → {}",
                student,
                format_optional_ts(rec.check_in),
                format_optional_ts(rec.check_out),
                describe_status(rec.status)
            ));
        }
        _ => {}
    }

    Ok(())
}
