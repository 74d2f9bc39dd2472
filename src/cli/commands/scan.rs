use crate::cli::commands::{open_db, resolve_instant};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::checkin::{CheckInLogic, ScanOutcome};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::formatting::describe_status;
use crate::utils::time::{format_optional_ts, format_ts};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Scan { student, event, at } = cmd {
        let at = resolve_instant(at)?;
        let mut pool = open_db(cfg)?;

        let outcome = CheckInLogic::scan(&mut pool, student, *event, at, cfg.grace_period())?;
        let rec = outcome.record();

        match &outcome {
            ScanOutcome::CheckedIn {
                auto_registered, ..
            } => {
                if *auto_registered {
                    info(format!("Student {} auto-registered for event #{}", student, event));
                }
                success(format!(
                    "Checked in {} at {} → {}",
                    student,
                    format_ts(&at),
                    describe_status(rec.status)
                ));
            }
            ScanOutcome::CheckedOut { .. } => {
                success(format!(
                    "Checked out {} ({} → {}) → {}",
                    student,
                    format_optional_ts(rec.check_in),
                    format_optional_ts(rec.check_out),
                    describe_status(rec.status)
                ));
            }
        }
    }

    Ok(())
}
