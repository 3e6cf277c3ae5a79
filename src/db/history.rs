//! Append-only audit trail of attendance transitions.

use crate::db::db_utils::instant_col;
use crate::errors::AppResult;
use crate::models::history::{HistoryAction, HistoryEntry};
use crate::utils::time::format_instant;
use chrono::NaiveDateTime;
use rusqlite::{Connection, params};

pub fn record(
    conn: &Connection,
    employee_id: i64,
    project_id: i64,
    action: HistoryAction,
    notes: &str,
    performed_at: NaiveDateTime,
) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO history (employee_id, project_id, action, notes, performed_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    stmt.execute(params![
        employee_id,
        project_id,
        action.to_db_str(),
        notes,
        format_instant(&performed_at),
    ])?;
    Ok(())
}

/// Like [`record`], but a failed insert is only logged. The transition it
/// documents has already been committed.
pub fn record_best_effort(
    conn: &Connection,
    employee_id: i64,
    project_id: i64,
    action: HistoryAction,
    notes: &str,
    performed_at: NaiveDateTime,
) {
    if let Err(e) = record(conn, employee_id, project_id, action, notes, performed_at) {
        tracing::warn!(
            error = %e,
            employee_id,
            project_id,
            action = action.to_db_str(),
            "Failed to write history entry"
        );
    }
}

pub fn list_history(
    conn: &Connection,
    employee_id: Option<i64>,
    limit: usize,
) -> AppResult<Vec<HistoryEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, employee_id, project_id, action, notes, performed_at FROM history
         WHERE ?1 IS NULL OR employee_id = ?1
         ORDER BY performed_at DESC, id DESC
         LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![employee_id, limit as i64], |row| {
        Ok(HistoryEntry {
            id: row.get("id")?,
            employee_id: row.get("employee_id")?,
            project_id: row.get("project_id")?,
            action: row.get("action")?,
            notes: row.get("notes")?,
            performed_at: instant_col(row, "performed_at")?.unwrap_or_default(),
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
