use crate::cli::commands::{instant_or_now, open_db};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::scan::{ScanOutcome, ScanRequest, process_scan};
use crate::errors::{AppError, AppResult};
use crate::models::scan_type::ScanType;
use crate::ui::messages;
use crate::utils::colors::{RESET, color_for_status};
use crate::utils::time::{format_hours, format_instant};

/// Handle the `scan` command
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Scan {
        project,
        employee,
        kind,
        at,
    } = &cli.command
    else {
        return Ok(());
    };

    let scan_type = ScanType::from_input(kind).ok_or_else(|| {
        AppError::Validation(format!("scan type must be 'entry' or 'exit', got '{}'", kind))
    })?;
    let req = ScanRequest {
        project_id: *project,
        employee_id: *employee,
        scan_type,
        occurred_at: instant_or_now(at.as_deref(), cfg)?,
    };

    let mut pool = open_db(cfg)?;
    let settings = cfg.settings();
    let outcome = pool.with_conn(|conn| process_scan(conn, &settings, &req))?;

    if cli.json {
        return messages::json(&outcome);
    }

    let session = outcome.session();
    let status = session.status.to_db_str();
    match &outcome {
        ScanOutcome::Entry(o) => {
            messages::success(format!(
                "Employee {} checked in on project {} at {} ({} shift)",
                session.employee_id,
                session.project_id,
                format_instant(&req.occurred_at),
                o.context.as_str()
            ));
            if o.late {
                messages::warning("Late arrival recorded");
            }
            if o.reopened {
                messages::info("The day's closed session was reopened");
            }
        }
        ScanOutcome::Exit(o) => {
            messages::success(format!(
                "Employee {} checked out of project {} at {}",
                session.employee_id,
                session.project_id,
                format_instant(&req.occurred_at)
            ));
            let b = &o.breakdown;
            println!("   worked      : {}", format_hours(b.actual_hours));
            println!(
                "   regular     : {} (planned {})",
                format_hours(b.regular_hours),
                format_hours(b.planned_regular_hours)
            );
            println!(
                "   overtime    : {} (planned {})",
                format_hours(b.overtime_hours),
                format_hours(b.planned_overtime_hours)
            );
            if b.unattributed_hours > 0.0 {
                println!("   unscheduled : {}", format_hours(b.unattributed_hours));
            }
        }
    }
    println!(
        "   status      : {}{}{}",
        color_for_status(status),
        status,
        RESET
    );

    Ok(())
}
