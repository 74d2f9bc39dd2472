use crate::cli::commands::open_db;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success};

fn migrate(pool: &DbPool) -> AppResult<()> {
    match init_db(&pool.conn)? {
        0 => info("Schema already up to date."),
        n => success(format!("{n} migration(s) applied.")),
    }
    Ok(())
}

fn integrity_check(pool: &DbPool) -> AppResult<()> {
    let mut stmt = pool.conn.prepare("PRAGMA integrity_check")?;
    let problems: Vec<String> = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<_>>()?;

    if problems.len() == 1 && problems[0] == "ok" {
        success("Integrity check passed.");
    } else {
        for p in &problems {
            error(format!("integrity: {p}"));
        }
    }
    Ok(())
}

/// `db --migrate --info --check --vacuum`, applied in that order.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate: do_migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    else {
        return Ok(());
    };

    let mut pool = open_db(cfg)?;

    if *do_migrate {
        migrate(&pool)?;
    }
    if *show_info {
        stats::print_db_info(&mut pool, &cfg.database)?;
    }
    if *check {
        integrity_check(&pool)?;
    }
    if *vacuum {
        pool.conn.execute_batch("VACUUM")?;
        success("Vacuum completed.");
    }

    Ok(())
}
