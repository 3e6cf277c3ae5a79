//! One-shot runs of the reconciliation and absence sweeps.

use crate::cli::commands::{clock, date_or_today, instant_or_now, open_db};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::absence::mark_absences;
use crate::core::clock::Clock;
use crate::core::reconcile::reconcile_open_sessions;
use crate::errors::AppResult;
use crate::ui::messages;
use crate::utils::colors::{RESET, color_for_status};
use crate::utils::date::format_date;
use crate::utils::time::{format_hours, format_instant};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Reconcile { at } => reconcile(cli, cfg, at.as_deref()),
        Commands::Absences { date } => absences(cli, cfg, date.as_deref()),
        _ => Ok(()),
    }
}

fn reconcile(cli: &Cli, cfg: &Config, at: Option<&str>) -> AppResult<()> {
    let now = instant_or_now(at, cfg)?;
    let settings = cfg.settings();
    let mut pool = open_db(cfg)?;
    let report = pool.with_conn(|conn| reconcile_open_sessions(conn, &settings, now))?;

    if cli.json {
        return messages::json(&report);
    }

    messages::info(format!(
        "Reconciliation at {}: {} open, {} closed, {} still running",
        format_instant(&now),
        report.visited,
        report.closed.len(),
        report.waiting
    ));
    for c in &report.closed {
        let status = c.status.to_db_str();
        println!(
            "   #{:<5} emp {:>4} proj {:>3} {} -> {} {}{}{} worked {} ({:?})",
            c.session_id,
            c.employee_id,
            c.project_id,
            format_date(&c.work_date),
            format_instant(&c.closed_at),
            color_for_status(status),
            status,
            RESET,
            format_hours(c.breakdown.actual_hours),
            c.kind
        );
    }
    for f in &report.failures {
        messages::error(format!("session {}: {}", f.session_id, f.error));
    }
    Ok(())
}

fn absences(cli: &Cli, cfg: &Config, date: Option<&str>) -> AppResult<()> {
    let date = date_or_today(date, cfg)?;
    let now = clock(cfg)?.now();
    let mut pool = open_db(cfg)?;
    let report = pool.with_conn(|conn| mark_absences(conn, date, now))?;

    if cli.json {
        return messages::json(&report);
    }

    if report.marked.is_empty() {
        messages::info(format!(
            "No absences for {} ({} scheduled, {} with a session)",
            format_date(&date),
            report.scheduled,
            report.with_session
        ));
        return Ok(());
    }

    messages::warning(format!(
        "{} employee(s) marked absent on {}",
        report.marked.len(),
        format_date(&date)
    ));
    for m in &report.marked {
        println!("   emp {:>4} proj {:>3}", m.employee_id, m.project_id);
    }
    Ok(())
}
