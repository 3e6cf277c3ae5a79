use crate::core::calculator::window::DayWindows;
use crate::db::db_utils::{date_col, date_param, enum_col};
use crate::db::directory::get_shift_type;
use crate::errors::AppResult;
use crate::models::schedule_entry::{EntryKey, LeaveType, ScheduleEntry, Slot};
use crate::utils::time::format_instant;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_entry(row: &Row) -> rusqlite::Result<ScheduleEntry> {
    let leave: Option<String> = row.get("leave_type")?;
    let leave_type = match leave {
        Some(_) => Some(enum_col(row, "leave_type", LeaveType::from_db_str)?),
        None => None,
    };
    Ok(ScheduleEntry {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        employee_id: row.get("employee_id")?,
        joker_slot: row.get("joker_slot")?,
        work_date: date_col(row, "work_date")?,
        regular_type_id: row.get("regular_type_id")?,
        regular_hours: row.get("regular_hours")?,
        leave_type,
        overtime_type_id: row.get("overtime_type_id")?,
        overtime_hours: row.get("overtime_hours")?,
        notes: row.get("notes")?,
    })
}

pub fn find_entry(conn: &Connection, key: &EntryKey) -> AppResult<Option<ScheduleEntry>> {
    let date = date_param(&key.date);
    let entry = match key.slot {
        Slot::Employee(employee_id) => conn
            .query_row(
                "SELECT * FROM schedule_entries
                 WHERE project_id = ?1 AND employee_id = ?2 AND work_date = ?3",
                params![key.project_id, employee_id, date],
                map_entry,
            )
            .optional()?,
        Slot::Joker(slot) => conn
            .query_row(
                "SELECT * FROM schedule_entries
                 WHERE project_id = ?1 AND employee_id IS NULL
                   AND joker_slot = ?2 AND work_date = ?3",
                params![key.project_id, slot, date],
                map_entry,
            )
            .optional()?,
    };
    Ok(entry)
}

/// Insert (`id == 0`) or update an entry; returns it with its id.
pub fn save_entry(
    conn: &Connection,
    entry: &ScheduleEntry,
    now: NaiveDateTime,
) -> AppResult<ScheduleEntry> {
    let updated_at = format_instant(&now);
    let leave = entry.leave_type.map(|l| l.to_db_str());

    if entry.id == 0 {
        conn.execute(
            "INSERT INTO schedule_entries
                (project_id, employee_id, joker_slot, work_date, regular_type_id,
                 regular_hours, leave_type, overtime_type_id, overtime_hours, notes, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                entry.project_id,
                entry.employee_id,
                entry.joker_slot,
                date_param(&entry.work_date),
                entry.regular_type_id,
                entry.regular_hours,
                leave,
                entry.overtime_type_id,
                entry.overtime_hours,
                entry.notes,
                updated_at,
            ],
        )?;
        let mut saved = entry.clone();
        saved.id = conn.last_insert_rowid();
        return Ok(saved);
    }

    conn.execute(
        "UPDATE schedule_entries
         SET regular_type_id = ?1, regular_hours = ?2, leave_type = ?3,
             overtime_type_id = ?4, overtime_hours = ?5, notes = ?6, updated_at = ?7
         WHERE id = ?8",
        params![
            entry.regular_type_id,
            entry.regular_hours,
            leave,
            entry.overtime_type_id,
            entry.overtime_hours,
            entry.notes,
            updated_at,
            entry.id,
        ],
    )?;
    Ok(entry.clone())
}

/// Employee entries for `date` that carry a regular window.
pub fn list_scheduled_employees(
    conn: &Connection,
    date: &NaiveDate,
) -> AppResult<Vec<ScheduleEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM schedule_entries
         WHERE work_date = ?1 AND employee_id IS NOT NULL AND regular_type_id IS NOT NULL
         ORDER BY project_id, employee_id",
    )?;
    let rows = stmt.query_map([date_param(date)], map_entry)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn list_entries_for_day(
    conn: &Connection,
    project_id: i64,
    date: &NaiveDate,
) -> AppResult<Vec<ScheduleEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM schedule_entries
         WHERE project_id = ?1 AND work_date = ?2
         ORDER BY employee_id IS NULL, employee_id, joker_slot",
    )?;
    let rows = stmt.query_map(params![project_id, date_param(date)], map_entry)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// A schedule cell together with the windows it references.
#[derive(Debug, Clone, Default)]
pub struct DayPlan {
    pub entry: Option<ScheduleEntry>,
    pub windows: DayWindows,
}

impl DayPlan {
    pub fn planned_regular_hours(&self) -> f64 {
        self.entry.as_ref().map(|e| e.regular_hours).unwrap_or(0.0)
    }

    pub fn planned_overtime_hours(&self) -> f64 {
        self.entry.as_ref().map(|e| e.overtime_hours).unwrap_or(0.0)
    }
}

pub fn load_day_plan(conn: &Connection, key: &EntryKey) -> AppResult<DayPlan> {
    let Some(entry) = find_entry(conn, key)? else {
        return Ok(DayPlan::default());
    };

    let regular = match entry.regular_type_id {
        Some(id) => get_shift_type(conn, id)?.map(|st| st.window()),
        None => None,
    };
    let overtime = match entry.overtime_type_id {
        Some(id) => get_shift_type(conn, id)?.map(|st| st.window()),
        None => None,
    };

    Ok(DayPlan {
        entry: Some(entry),
        windows: DayWindows { regular, overtime },
    })
}

/// Regular/overtime windows scheduled for a slot on a date.
pub fn get_project_shift_windows(
    conn: &Connection,
    project_id: i64,
    date: NaiveDate,
    slot: Slot,
) -> AppResult<DayWindows> {
    let key = EntryKey {
        project_id,
        slot,
        date,
    };
    Ok(load_day_plan(conn, &key)?.windows)
}
