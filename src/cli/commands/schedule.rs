//! Schedule cells: toggle, overtime, leave and the day view.

use crate::cli::commands::{clock, date_or_today, open_db, required_date, slot_of};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::clock::Clock;
use crate::core::schedule::{clear_overtime, set_leave_type, set_overtime_type, toggle};
use crate::db::directory::{list_shift_types, require_project};
use crate::db::schedule::list_entries_for_day;
use crate::errors::{AppError, AppResult};
use crate::models::schedule_entry::{EntryKey, LeaveType, ScheduleEntry, Slot};
use crate::models::shift::ShiftType;
use crate::ui::messages;
use crate::utils::colors::{GREY, RESET};
use crate::utils::date::format_date;
use crate::utils::time::format_hours;
use chrono::NaiveDate;
use std::collections::HashMap;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Schedule { project, date } = &cli.command {
        let date = date_or_today(date.as_deref(), cfg)?;
        return show_day(cli, cfg, *project, date);
    }

    let mut pool = open_db(cfg)?;
    let now = clock(cfg)?.now();

    let entry = match &cli.command {
        Commands::Toggle {
            project,
            date,
            slot,
            shift,
        } => {
            let key = key_of(*project, date, slot_of(slot)?)?;
            pool.with_conn(|conn| toggle(conn, &key, *shift, now))?
        }
        Commands::Overtime {
            project,
            date,
            slot,
            shift,
            clear,
        } => {
            let key = key_of(*project, date, slot_of(slot)?)?;
            if *clear {
                pool.with_conn(|conn| clear_overtime(conn, &key, now))?
            } else {
                pool.with_conn(|conn| set_overtime_type(conn, &key, *shift, now))?
            }
        }
        Commands::Leave {
            project,
            date,
            slot,
            leave,
        } => {
            let key = key_of(*project, date, slot_of(slot)?)?;
            let leave = parse_leave(leave.as_deref())?;
            pool.with_conn(|conn| set_leave_type(conn, &key, leave, now))?
        }
        _ => return Ok(()),
    };

    if cli.json {
        return messages::json(&entry);
    }

    let types = list_shift_types(&pool.conn, entry.project_id, None)?;
    let names: HashMap<i64, &ShiftType> = types.iter().map(|t| (t.id, t)).collect();
    messages::success(format!(
        "{} on {}: {}",
        slot_label(&entry),
        format_date(&entry.work_date),
        describe(&entry, &names)
    ));
    Ok(())
}

fn key_of(project: i64, date: &str, slot: Slot) -> AppResult<EntryKey> {
    Ok(EntryKey {
        project_id: project,
        slot,
        date: required_date(date)?,
    })
}

fn parse_leave(s: Option<&str>) -> AppResult<Option<LeaveType>> {
    match s {
        None => Ok(None),
        Some(v) => LeaveType::from_db_str(&v.trim().to_lowercase())
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("unknown leave type '{}'", v))),
    }
}

fn slot_label(entry: &ScheduleEntry) -> String {
    match (entry.employee_id, entry.joker_slot) {
        (Some(id), _) => format!("employee {}", id),
        (None, Some(n)) => format!("joker #{}", n),
        (None, None) => "?".to_string(),
    }
}

fn describe(entry: &ScheduleEntry, types: &HashMap<i64, &ShiftType>) -> String {
    let regular = match (entry.regular_type_id, entry.leave_type) {
        (Some(id), _) => match types.get(&id) {
            Some(t) => format!("{} ({})", t.name, format_hours(entry.regular_hours)),
            None => format!("shift #{}", id),
        },
        (None, Some(leave)) => format!("leave: {}", leave.to_db_str()),
        (None, None) => format!("{GREY}off{RESET}"),
    };

    match entry.overtime_type_id {
        Some(id) => {
            let name = types.get(&id).map_or("overtime", |t| t.name.as_str());
            format!(
                "{} + {} ({})",
                regular,
                name,
                format_hours(entry.overtime_hours)
            )
        }
        None => regular,
    }
}

fn show_day(cli: &Cli, cfg: &Config, project_id: i64, date: NaiveDate) -> AppResult<()> {
    let pool = open_db(cfg)?;
    let project = require_project(&pool.conn, project_id)?;
    let entries = list_entries_for_day(&pool.conn, project.id, &date)?;

    if cli.json {
        return messages::json(&entries);
    }
    if entries.is_empty() {
        messages::info(format!(
            "Nothing scheduled for {} on {}",
            project.name,
            format_date(&date)
        ));
        return Ok(());
    }

    let types = list_shift_types(&pool.conn, project.id, None)?;
    let names: HashMap<i64, &ShiftType> = types.iter().map(|t| (t.id, t)).collect();

    messages::header(format!("{} | {}", project.name, format_date(&date)));
    for e in &entries {
        let notes = if e.notes.is_empty() {
            String::new()
        } else {
            format!("  [{}]", e.notes)
        };
        println!("{:<14} {}{}", slot_label(e), describe(e, &names), notes);
    }
    Ok(())
}
