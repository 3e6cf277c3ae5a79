use crate::db::db_utils::{date_col, date_param, enum_col, instant_col, instant_param};
use crate::errors::AppResult;
use crate::models::attendance::{AttendanceSession, AttendanceStatus};
use crate::utils::time::format_instant;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<AttendanceSession> {
    Ok(AttendanceSession {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        employee_id: row.get("employee_id")?,
        work_date: date_col(row, "work_date")?,
        check_in_at: instant_col(row, "check_in_at")?,
        check_out_at: instant_col(row, "check_out_at")?,
        status: enum_col(row, "status", AttendanceStatus::from_db_str)?,
        planned_hours: row.get("planned_hours")?,
        actual_hours: row.get("actual_hours")?,
        overtime_hours: row.get("overtime_hours")?,
        session_tag: row.get("session_tag")?,
        notes: row.get("notes")?,
    })
}

pub fn find_session(
    conn: &Connection,
    project_id: i64,
    employee_id: i64,
    date: &NaiveDate,
) -> AppResult<Option<AttendanceSession>> {
    let session = conn
        .query_row(
            "SELECT * FROM attendance_sessions
             WHERE project_id = ?1 AND employee_id = ?2 AND work_date = ?3",
            params![project_id, employee_id, date_param(date)],
            map_row,
        )
        .optional()?;
    Ok(session)
}

pub fn get_session(conn: &Connection, id: i64) -> AppResult<Option<AttendanceSession>> {
    let session = conn
        .query_row(
            "SELECT * FROM attendance_sessions WHERE id = ?1",
            [id],
            map_row,
        )
        .optional()?;
    Ok(session)
}

/// Insert a new row (`id` ignored) and return it with its id.
pub fn insert_session(
    conn: &Connection,
    s: &AttendanceSession,
    now: NaiveDateTime,
) -> AppResult<AttendanceSession> {
    let ts = format_instant(&now);
    conn.execute(
        "INSERT INTO attendance_sessions
            (project_id, employee_id, work_date, check_in_at, check_out_at, status,
             planned_hours, actual_hours, overtime_hours, session_tag, notes,
             created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
        params![
            s.project_id,
            s.employee_id,
            date_param(&s.work_date),
            instant_param(&s.check_in_at),
            instant_param(&s.check_out_at),
            s.status.to_db_str(),
            s.planned_hours,
            s.actual_hours,
            s.overtime_hours,
            s.session_tag,
            s.notes,
            ts,
        ],
    )?;
    let mut saved = s.clone();
    saved.id = conn.last_insert_rowid();
    Ok(saved)
}

/// Insert unless a row for the same (project, employee, date) exists.
/// Returns whether a row was written.
pub fn insert_session_if_absent(
    conn: &Connection,
    s: &AttendanceSession,
    now: NaiveDateTime,
) -> AppResult<bool> {
    let ts = format_instant(&now);
    let n = conn.execute(
        "INSERT OR IGNORE INTO attendance_sessions
            (project_id, employee_id, work_date, check_in_at, check_out_at, status,
             planned_hours, actual_hours, overtime_hours, session_tag, notes,
             created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
        params![
            s.project_id,
            s.employee_id,
            date_param(&s.work_date),
            instant_param(&s.check_in_at),
            instant_param(&s.check_out_at),
            s.status.to_db_str(),
            s.planned_hours,
            s.actual_hours,
            s.overtime_hours,
            s.session_tag,
            s.notes,
            ts,
        ],
    )?;
    Ok(n == 1)
}

pub fn update_session(
    conn: &Connection,
    s: &AttendanceSession,
    now: NaiveDateTime,
) -> AppResult<()> {
    conn.execute(
        "UPDATE attendance_sessions
         SET check_in_at = ?1, check_out_at = ?2, status = ?3, planned_hours = ?4,
             actual_hours = ?5, overtime_hours = ?6, session_tag = ?7, notes = ?8,
             updated_at = ?9
         WHERE id = ?10",
        params![
            instant_param(&s.check_in_at),
            instant_param(&s.check_out_at),
            s.status.to_db_str(),
            s.planned_hours,
            s.actual_hours,
            s.overtime_hours,
            s.session_tag,
            s.notes,
            format_instant(&now),
            s.id,
        ],
    )?;
    Ok(())
}

/// Close a session only if it is still open. Returns whether it was closed.
pub fn close_if_open(
    conn: &Connection,
    s: &AttendanceSession,
    now: NaiveDateTime,
) -> AppResult<bool> {
    let n = conn.execute(
        "UPDATE attendance_sessions
         SET check_out_at = ?1, status = ?2, planned_hours = ?3, actual_hours = ?4,
             overtime_hours = ?5, notes = ?6, updated_at = ?7
         WHERE id = ?8 AND check_in_at IS NOT NULL AND check_out_at IS NULL",
        params![
            instant_param(&s.check_out_at),
            s.status.to_db_str(),
            s.planned_hours,
            s.actual_hours,
            s.overtime_hours,
            s.notes,
            format_instant(&now),
            s.id,
        ],
    )?;
    Ok(n == 1)
}

/// Every session checked in and not out, across all dates.
pub fn list_open_sessions(conn: &Connection) -> AppResult<Vec<AttendanceSession>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM attendance_sessions
         WHERE check_in_at IS NOT NULL AND check_out_at IS NULL
         ORDER BY work_date ASC, id ASC",
    )?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn list_sessions_for_date(
    conn: &Connection,
    date: &NaiveDate,
) -> AppResult<Vec<AttendanceSession>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM attendance_sessions
         WHERE work_date = ?1
         ORDER BY project_id, employee_id",
    )?;
    let rows = stmt.query_map([date_param(date)], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
