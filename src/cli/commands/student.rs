use crate::cli::commands::open_db;
use crate::cli::parser::StudentCommands;
use crate::config::Config;
use crate::core::admin::AdminLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(action: &StudentCommands, cfg: &Config) -> AppResult<()> {
    let mut pool = open_db(cfg)?;

    match action {
        StudentCommands::Add { number, name } => {
            AdminLogic::add_student(&mut pool, number, name.trim())?;
            success(format!("Student {} ({}) added", number.trim(), name.trim()));
        }
    }

    Ok(())
}
