//! Employees, projects and shift types.

use crate::cli::commands::open_db;
use crate::cli::parser::Cli;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::window::ShiftWindow;
use crate::db::directory::{
    insert_employee, insert_project, insert_shift_type, list_shift_types, require_project,
    set_employee_active,
};
use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::models::shift::ShiftCategory;
use crate::ui::messages;
use crate::utils::time::{format_hours, format_time, parse_required_time};
use rusqlite::Connection;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let pool = open_db(cfg)?;
    let conn = &pool.conn;

    match &cli.command {
        Commands::AddEmployee { name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Validation("employee name must not be empty".into()));
            }
            let emp = insert_employee(conn, name)?;
            note(conn, "employee", &format!("Added employee {} ({})", emp.id, emp.full_name));
            if cli.json {
                return messages::json(&emp);
            }
            messages::success(format!("Employee {} added: {}", emp.id, emp.full_name));
        }

        Commands::SetActive { employee, inactive } => {
            set_employee_active(conn, *employee, !*inactive)?;
            let state = if *inactive { "deactivated" } else { "activated" };
            note(conn, "employee", &format!("Employee {} {}", employee, state));
            messages::success(format!("Employee {} {}", employee, state));
        }

        Commands::AddProject { name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Validation("project name must not be empty".into()));
            }
            let project = insert_project(conn, name)?;
            note(conn, "project", &format!("Added project {} ({})", project.id, project.name));
            if cli.json {
                return messages::json(&project);
            }
            messages::success(format!("Project {} added: {}", project.id, project.name));
        }

        Commands::AddShift {
            project,
            name,
            start,
            end,
            overtime,
            hours,
            rank,
        } => {
            require_project(conn, *project)?;
            let start = parse_required_time(start)?;
            let end = parse_required_time(end)?;
            let category = if *overtime {
                ShiftCategory::Overtime
            } else {
                ShiftCategory::Regular
            };

            let duration = hours.unwrap_or(ShiftWindow::from_times(start, end).duration_hours);
            if duration <= 0.0 {
                return Err(AppError::Validation("shift length must be positive".into()));
            }

            let rank = match rank {
                Some(r) => *r,
                None => list_shift_types(conn, *project, Some(category))?
                    .iter()
                    .map(|t| t.rank)
                    .max()
                    .map_or(1, |r| r + 1),
            };

            let st = insert_shift_type(
                conn, *project, name, category, start, end, duration, rank,
            )?;
            note(
                conn,
                "shift_type",
                &format!(
                    "Added {} shift {} '{}' to project {}",
                    category.to_db_str(),
                    st.id,
                    st.name,
                    project
                ),
            );
            if cli.json {
                return messages::json(&st);
            }
            messages::success(format!(
                "Shift type {} added: {} {}-{} ({})",
                st.id,
                st.name,
                format_time(&st.start_time),
                format_time(&st.end_time),
                format_hours(st.duration_hours)
            ));
        }

        Commands::Shifts { project } => {
            let project = require_project(conn, *project)?;
            let types = list_shift_types(conn, project.id, None)?;
            if cli.json {
                return messages::json(&types);
            }
            if types.is_empty() {
                messages::info(format!("No shift types for project {}", project.name));
                return Ok(());
            }

            messages::header(format!("Shift types of {}", project.name));
            println!(
                "{:>4}  {:<9} {:>4}  {:<16} {:<8} {:<8} {:>8}",
                "ID", "CATEGORY", "RANK", "NAME", "START", "END", "HOURS"
            );
            for t in types {
                let night = if t.window().crosses_midnight() { " 🌙" } else { "" };
                println!(
                    "{:>4}  {:<9} {:>4}  {:<16} {:<8} {:<8} {:>8}{}",
                    t.id,
                    t.category.to_db_str(),
                    t.rank,
                    t.name,
                    format_time(&t.start_time),
                    format_time(&t.end_time),
                    format_hours(t.duration_hours),
                    night
                );
            }
        }

        _ => {}
    }

    Ok(())
}

/// Operator log line; a failure here never fails the command.
fn note(conn: &Connection, target: &str, message: &str) {
    if let Err(e) = ttlog(conn, "directory", target, message) {
        tracing::warn!(error = %e, "Failed to write internal log");
    }
}
