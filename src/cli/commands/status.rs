use crate::cli::commands::{open_db, resolve_instant};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::checkin::CheckInLogic;
use crate::errors::AppResult;
use crate::utils::formatting::{bold, describe_status};
use crate::utils::time::{format_optional_ts, format_ts};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { student, event, at } = cmd {
        let at = resolve_instant(at)?;
        let mut pool = open_db(cfg)?;

        let (rec, status) = CheckInLogic::status(&mut pool, student, *event, at, cfg.grace_period())?;

        println!("{} {} @ event #{}", bold("Student"), student, event);
        println!("  as of     : {}", format_ts(&at));
        match &rec {
            Some(r) => {
                println!("  check-in  : {}", format_optional_ts(r.check_in));
                println!("  check-out : {}", format_optional_ts(r.check_out));
                println!("  stored    : {}", describe_status(r.status));
            }
            None => println!("  no attendance record"),
        }
        println!("  status    : {}", describe_status(Some(status)));
    }

    Ok(())
}
