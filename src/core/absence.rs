//! Daily materialization of `absent` rows for scheduled employees who never
//! scanned in.

use crate::db::attendance::{insert_session_if_absent, list_sessions_for_date};
use crate::db::history::record_best_effort;
use crate::db::schedule::list_scheduled_employees;
use crate::errors::AppResult;
use crate::models::attendance::{AttendanceSession, AttendanceStatus, SYSTEM_TAG};
use crate::models::history::HistoryAction;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;
use std::collections::HashSet;

pub const ABSENCE_NOTE: &str = "system-generated absence";

#[derive(Debug, Clone, Serialize)]
pub struct MarkedAbsent {
    pub employee_id: i64,
    pub project_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AbsenceReport {
    pub date: NaiveDate,
    pub scheduled: usize,
    pub with_session: usize,
    pub marked: Vec<MarkedAbsent>,
}

/// Insert an `absent` row for every (project, employee) scheduled on `date`
/// with no attendance row at all. Rows of any status, open ones included,
/// are left alone.
pub fn mark_absences(
    conn: &mut Connection,
    date: NaiveDate,
    now: NaiveDateTime,
) -> AppResult<AbsenceReport> {
    // One write transaction: a scan either committed before the snapshot or
    // waits and then finds the absent row to reuse.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let scheduled = list_scheduled_employees(&tx, &date)?;
    let existing: HashSet<(i64, i64)> = list_sessions_for_date(&tx, &date)?
        .iter()
        .map(|s| (s.project_id, s.employee_id))
        .collect();

    let mut report = AbsenceReport {
        date,
        scheduled: scheduled.len(),
        with_session: 0,
        marked: Vec::new(),
    };

    for entry in &scheduled {
        let Some(employee_id) = entry.employee_id else {
            continue;
        };
        if existing.contains(&(entry.project_id, employee_id)) {
            report.with_session += 1;
            continue;
        }

        let row = AttendanceSession {
            id: 0,
            project_id: entry.project_id,
            employee_id,
            work_date: date,
            check_in_at: None,
            check_out_at: None,
            status: AttendanceStatus::Absent,
            planned_hours: entry.regular_hours,
            actual_hours: 0.0,
            overtime_hours: 0.0,
            session_tag: SYSTEM_TAG.to_string(),
            notes: ABSENCE_NOTE.to_string(),
        };
        if insert_session_if_absent(&tx, &row, now)? {
            report.marked.push(MarkedAbsent {
                employee_id,
                project_id: entry.project_id,
            });
        }
    }

    tx.commit()?;

    for m in &report.marked {
        record_best_effort(
            conn,
            m.employee_id,
            m.project_id,
            HistoryAction::MarkedAbsent,
            ABSENCE_NOTE,
            now,
        );
    }

    tracing::info!(
        date = %date,
        scheduled = report.scheduled,
        marked = report.marked.len(),
        "Absence sweep finished"
    );

    Ok(report)
}
