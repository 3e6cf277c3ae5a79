use crate::cli::commands::{date_or_today, open_db};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::db::attendance::list_sessions_for_date;
use crate::errors::AppResult;
use crate::models::attendance::AttendanceSession;
use crate::ui::messages;
use crate::utils::colors::{RESET, color_for_status, colorize_optional};
use crate::utils::date::format_date;
use crate::utils::time::format_hours;
use chrono::NaiveDateTime;

/// Handle the `list` command: attendance sessions of one day.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::List { date, project } = &cli.command else {
        return Ok(());
    };

    let date = date_or_today(date.as_deref(), cfg)?;
    let pool = open_db(cfg)?;
    let sessions: Vec<AttendanceSession> = list_sessions_for_date(&pool.conn, &date)?
        .into_iter()
        .filter(|s| project.is_none_or(|p| s.project_id == p))
        .collect();

    if cli.json {
        return messages::json(&sessions);
    }
    if sessions.is_empty() {
        println!("No attendance sessions for {}", format_date(&date));
        return Ok(());
    }

    messages::header(format!("Attendance {}", format_date(&date)));
    println!(
        "{:>5}  {:>4}  {:>4}  {:<6} {:<6} {:>8} {:>8} {:>8}  {:<12} {}",
        "ID", "PROJ", "EMP", "IN", "OUT", "PLANNED", "WORKED", "OVERT.", "STATUS", "TAG"
    );

    for s in &sessions {
        let status = s.status.to_db_str();
        println!(
            "{:>5}  {:>4}  {:>4}  {} {} {:>8} {:>8} {:>8}  {}{:<12}{} {}",
            s.id,
            s.project_id,
            s.employee_id,
            colorize_optional(&format!("{:<6}", hhmm(s.check_in_at))),
            colorize_optional(&format!("{:<6}", hhmm(s.check_out_at))),
            format_hours(s.planned_hours),
            format_hours(s.actual_hours),
            format_hours(s.overtime_hours),
            color_for_status(status),
            status,
            RESET,
            s.session_tag
        );
    }
    Ok(())
}

fn hhmm(t: Option<NaiveDateTime>) -> String {
    t.map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
