use crate::db::pool::DbPool;
use crate::models::attendance_status::AttendanceStatus;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

fn count(pool: &DbPool, table: &str) -> rusqlite::Result<i64> {
    pool.conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) TOTALS
    //
    for (label, table) in [
        ("Events", "events"),
        ("Students", "students"),
        ("Registrations", "registrations"),
        ("Attendance rows", "attendance"),
    ] {
        let n = count(pool, table)?;
        println!("{}• {}:{} {}{}{}", CYAN, label, RESET, GREEN, n, RESET);
    }

    //
    // 3) STATUS BREAKDOWN
    //
    println!("{}• By status:{}", CYAN, RESET);
    for status in AttendanceStatus::ALL {
        let n: i64 = pool.conn.query_row(
            "SELECT COUNT(*) FROM attendance WHERE status = ?1",
            [status.to_db_str()],
            |row| row.get(0),
        )?;
        println!("    {:<11} {}", status.to_db_str(), n);
    }
    let unset: i64 = pool.conn.query_row(
        "SELECT COUNT(*) FROM attendance WHERE status IS NULL",
        [],
        |row| row.get(0),
    )?;
    println!("    {:<11} {}", "unset", unset);

    //
    // 4) DATE RANGE
    //
    let first_date: Option<String> = pool
        .conn
        .query_row("SELECT MIN(date) FROM events", [], |row| {
            row.get::<_, Option<String>>(0)
        })
        .optional()?
        .flatten();
    let last_date: Option<String> = pool
        .conn
        .query_row("SELECT MAX(date) FROM events", [], |row| {
            row.get::<_, Option<String>>(0)
        })
        .optional()?
        .flatten();

    let fmt_first = first_date.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last_date.unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Event dates:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    println!();
    Ok(())
}
