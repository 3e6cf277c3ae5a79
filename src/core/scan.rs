//! QR scan processing: opens and closes attendance sessions.

use crate::config::Settings;
use crate::core::calculator::attribution::{HourBreakdown, attribute_hours};
use crate::core::calculator::context::{ScanContext, classify_in, is_late};
use crate::db::attendance::{find_session, insert_session, update_session};
use crate::db::directory::{get_employee, require_project};
use crate::db::history::record_best_effort;
use crate::db::schedule::load_day_plan;
use crate::errors::{AppError, AppResult, ConflictKind};
use crate::models::attendance::{AttendanceSession, AttendanceStatus};
use crate::models::history::HistoryAction;
use crate::models::scan_type::ScanType;
use crate::models::schedule_entry::EntryKey;
use crate::utils::time::format_instant;
use chrono::NaiveDateTime;
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct ScanRequest {
    pub project_id: i64,
    pub employee_id: i64,
    pub scan_type: ScanType,
    pub occurred_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryOutcome {
    pub session: AttendanceSession,
    pub context: ScanContext,
    pub late: bool,
    /// The day's session had been closed and was opened again.
    pub reopened: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExitOutcome {
    pub session: AttendanceSession,
    pub breakdown: HourBreakdown,
    /// Window the work most likely started in.
    pub started_in: ScanContext,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "scan", rename_all = "snake_case")]
pub enum ScanOutcome {
    Entry(EntryOutcome),
    Exit(ExitOutcome),
}

impl ScanOutcome {
    pub fn session(&self) -> &AttendanceSession {
        match self {
            ScanOutcome::Entry(o) => &o.session,
            ScanOutcome::Exit(o) => &o.session,
        }
    }
}

pub fn process_scan(
    conn: &mut Connection,
    settings: &Settings,
    req: &ScanRequest,
) -> AppResult<ScanOutcome> {
    validate(conn, req)?;

    match req.scan_type {
        ScanType::Entry => check_in(conn, settings, req).map(ScanOutcome::Entry),
        ScanType::Exit => check_out(conn, settings, req).map(ScanOutcome::Exit),
    }
}

fn validate(conn: &Connection, req: &ScanRequest) -> AppResult<()> {
    if req.project_id <= 0 {
        return Err(AppError::Validation("project id must be positive".into()));
    }
    if req.employee_id <= 0 {
        return Err(AppError::Validation("employee id must be positive".into()));
    }

    let employee = get_employee(conn, req.employee_id)?
        .ok_or_else(|| AppError::NotFound(format!("employee {}", req.employee_id)))?;
    if !employee.active {
        return Err(AppError::Validation(format!(
            "employee {} is not active",
            employee.id
        )));
    }
    require_project(conn, req.project_id)?;
    Ok(())
}

fn check_in(
    conn: &mut Connection,
    settings: &Settings,
    req: &ScanRequest,
) -> AppResult<EntryOutcome> {
    let date = req.occurred_at.date();
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let existing = find_session(&tx, req.project_id, req.employee_id, &date)?;
    if existing.as_ref().is_some_and(|s| s.is_open()) {
        return Err(AppError::Conflict(ConflictKind::AlreadyOpen));
    }

    let plan = load_day_plan(
        &tx,
        &EntryKey::employee(req.project_id, req.employee_id, date),
    )?;
    let windows = plan.windows.resolve(date);
    let context = classify_in(req.occurred_at, &windows, settings.context_tie_break);
    let late = is_late(
        req.occurred_at,
        context.window_start(&windows),
        settings.late_grace,
    );
    let status = if late {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Incomplete
    };

    let mut previous_close = None;
    let session = match existing {
        None => {
            let fresh = AttendanceSession {
                id: 0,
                project_id: req.project_id,
                employee_id: req.employee_id,
                work_date: date,
                check_in_at: Some(req.occurred_at),
                check_out_at: None,
                status,
                planned_hours: plan.planned_regular_hours(),
                actual_hours: 0.0,
                overtime_hours: 0.0,
                session_tag: context.as_str().to_string(),
                notes: String::new(),
            };
            insert_session(&tx, &fresh, req.occurred_at)?
        }
        Some(mut s) => {
            // Absent placeholder or a session closed earlier today.
            if let (Some(in_at), Some(out_at)) = (s.check_in_at, s.check_out_at) {
                previous_close = Some((in_at, out_at, s.actual_hours));
            }
            s.check_in_at = Some(req.occurred_at);
            s.check_out_at = None;
            s.status = status;
            s.planned_hours = plan.planned_regular_hours();
            s.actual_hours = 0.0;
            s.overtime_hours = 0.0;
            s.session_tag = context.as_str().to_string();
            update_session(&tx, &s, req.occurred_at)?;
            s
        }
    };

    tx.commit()?;

    let mut notes = format!(
        "entry scan at {} (context={}, late={})",
        format_instant(&req.occurred_at),
        context.as_str(),
        late
    );
    if let Some((in_at, out_at, hours)) = previous_close {
        notes.push_str(&format!(
            "; reopened session previously {} -> {} ({:.2}h)",
            format_instant(&in_at),
            format_instant(&out_at),
            hours
        ));
    }
    record_best_effort(
        conn,
        req.employee_id,
        req.project_id,
        HistoryAction::Entry,
        &notes,
        req.occurred_at,
    );

    tracing::info!(
        session_id = session.id,
        employee_id = req.employee_id,
        project_id = req.project_id,
        context = context.as_str(),
        late,
        "Checked in"
    );

    Ok(EntryOutcome {
        session,
        context,
        late,
        reopened: previous_close.is_some(),
    })
}

fn check_out(
    conn: &mut Connection,
    settings: &Settings,
    req: &ScanRequest,
) -> AppResult<ExitOutcome> {
    let date = req.occurred_at.date();
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let todays = find_session(&tx, req.project_id, req.employee_id, &date)?;
    let mut session = match todays {
        Some(s) if s.is_open() => s,
        todays => {
            // A night shift is still open on the previous day's row.
            let previous = match date.pred_opt() {
                Some(d) => find_session(&tx, req.project_id, req.employee_id, &d)?,
                None => None,
            };
            match (todays, previous) {
                (_, Some(p)) if p.is_open() => p,
                (Some(s), _) if s.is_closed() => {
                    return Err(AppError::Conflict(ConflictKind::AlreadyClosed));
                }
                // Yesterday's shift was already closed and nothing opened today.
                (None, Some(p)) if p.is_closed() => {
                    return Err(AppError::Conflict(ConflictKind::AlreadyClosed));
                }
                _ => return Err(AppError::Conflict(ConflictKind::NoOpenSession)),
            }
        }
    };

    let check_in = session
        .check_in_at
        .ok_or(AppError::Conflict(ConflictKind::NoOpenSession))?;
    if req.occurred_at < check_in {
        return Err(AppError::Validation(format!(
            "exit scan at {} precedes check-in at {}",
            format_instant(&req.occurred_at),
            format_instant(&check_in)
        )));
    }

    let plan = load_day_plan(
        &tx,
        &EntryKey::employee(req.project_id, req.employee_id, session.work_date),
    )?;
    let windows = plan.windows.resolve(session.work_date);
    let breakdown = attribute_hours(
        check_in,
        req.occurred_at,
        &windows,
        plan.planned_regular_hours(),
        plan.planned_overtime_hours(),
    );
    let started_in = classify_in(check_in, &windows, settings.context_tie_break);

    session.check_out_at = Some(req.occurred_at);
    session.actual_hours = breakdown.actual_hours;
    session.overtime_hours = breakdown.overtime_hours;
    session.planned_hours = plan.planned_regular_hours();
    if session.status == AttendanceStatus::Incomplete {
        session.status = AttendanceStatus::Present;
    }
    update_session(&tx, &session, req.occurred_at)?;

    tx.commit()?;

    let notes = format!(
        "exit scan at {} (started in {}): {}",
        format_instant(&req.occurred_at),
        started_in.as_str(),
        breakdown.describe()
    );
    record_best_effort(
        conn,
        req.employee_id,
        req.project_id,
        HistoryAction::Exit,
        &notes,
        req.occurred_at,
    );

    tracing::info!(
        session_id = session.id,
        employee_id = req.employee_id,
        project_id = req.project_id,
        actual_hours = breakdown.actual_hours,
        overtime_hours = breakdown.overtime_hours,
        "Checked out"
    );

    Ok(ExitOutcome {
        session,
        breakdown,
        started_in,
    })
}
