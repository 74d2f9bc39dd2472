use crate::cli::commands::{open_db, resolve_instant};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::reconcile::ReconcileLogic;
use crate::errors::{AppError, AppResult};
use crate::models::reconcile_report::ReconcileReport;
use crate::ui::messages::{error, info, success};
use crate::utils::table::Table;
use crate::utils::time::format_ts;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Reconcile { event, as_of, json } = cmd {
        let as_of = resolve_instant(as_of)?;
        let mut pool = open_db(cfg)?;

        let report = ReconcileLogic::run(&mut pool, as_of, *event, cfg.grace_period())?;

        if *json {
            let out = serde_json::to_string_pretty(&report)
                .map_err(|e| AppError::Other(e.to_string()))?;
            println!("{}", out);
        } else {
            print_report(&report);
        }
    }

    Ok(())
}

fn print_report(report: &ReconcileReport) {
    info(format!("Reconciliation as of {}", format_ts(&report.as_of)));

    if report.events.is_empty() && report.failures.is_empty() {
        info("No ended events to reconcile.");
        return;
    }

    if !report.events.is_empty() {
        let mut table = Table::new(&["EVENT", "NAME", "ABSENT", "LATE", "EARLY", "PARTIAL", "TOTAL"]);
        for ev in &report.events {
            table.add_row(vec![
                ev.event_id.to_string(),
                ev.event_name.clone(),
                ev.absent_count.to_string(),
                ev.late_count.to_string(),
                ev.early_count.to_string(),
                ev.partial_count.to_string(),
                ev.changes().to_string(),
            ]);
        }
        println!("{}", table.render());
    }

    for f in &report.failures {
        error(format!("Event #{} not reconciled: {}", f.event_id, f.reason));
    }

    success(format!(
        "{} event(s) processed: {} absent, {} late, {} left early, {} partial",
        report.events_processed,
        report.absent_count,
        report.late_count,
        report.early_count,
        report.partial_count
    ));
}
