use crate::cli::commands::open_db;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        event,
        force,
    } = cmd
    {
        let mut pool = open_db(cfg)?;
        let written = ExportLogic::export(&mut pool, *format, file, range, *event, *force)?;
        if written > 0 {
            info(format!("{} row(s) written as {}", written, format.as_str()));
        }
    }
    Ok(())
}
