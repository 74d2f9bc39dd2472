use crate::cli::commands::open_db;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::admin::AdminLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Register { student, event } = cmd {
        let mut pool = open_db(cfg)?;

        if AdminLogic::register(&mut pool, student, *event)? {
            success(format!("Student {} registered for event #{}", student, event));
        } else {
            info(format!(
                "Student {} was already registered for event #{}",
                student, event
            ));
        }
    }

    Ok(())
}
