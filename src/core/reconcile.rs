//! Reconciliation of sessions nobody closed.
//!
//! A sweep visits every open session regardless of date and force-closes
//! the ones past their expected end. Each row is handled in its own
//! transaction; a failing row is logged and the sweep moves on.

use crate::config::Settings;
use crate::core::calculator::attribution::{HourBreakdown, simple_split};
use crate::core::calculator::window::{hours_between, hours_to_duration};
use crate::db::attendance::{close_if_open, list_open_sessions};
use crate::db::history::record_best_effort;
use crate::db::schedule::{DayPlan, load_day_plan};
use crate::errors::AppResult;
use crate::models::attendance::{AttendanceSession, AttendanceStatus};
use crate::models::history::HistoryAction;
use crate::models::schedule_entry::EntryKey;
use crate::utils::time::format_instant;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CloseKind {
    /// Past day without a usable schedule: closed after the default length.
    Fallback,
    /// Past day closed at its expected end.
    PastDay,
    /// Same-day session closed once the buffer after its end elapsed.
    SameDay,
}

impl CloseKind {
    fn history_action(&self) -> HistoryAction {
        match self {
            CloseKind::Fallback | CloseKind::PastDay => HistoryAction::PastDayCheckout,
            CloseKind::SameDay => HistoryAction::AutoCheckout,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            CloseKind::Fallback => "past-day catch-up (no schedule, default length)",
            CloseKind::PastDay => "past-day catch-up",
            CloseKind::SameDay => "same-day auto-checkout",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CloseDecision {
    Wait,
    Close {
        at: NaiveDateTime,
        kind: CloseKind,
        status: AttendanceStatus,
        breakdown: HourBreakdown,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ClosedSession {
    pub session_id: i64,
    pub employee_id: i64,
    pub project_id: i64,
    pub work_date: NaiveDate,
    pub closed_at: NaiveDateTime,
    pub kind: CloseKind,
    pub status: AttendanceStatus,
    pub breakdown: HourBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepFailure {
    pub session_id: i64,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub visited: usize,
    pub waiting: usize,
    pub closed: Vec<ClosedSession>,
    pub failures: Vec<SweepFailure>,
}

/// Status given to a session the system closes. A late check-in is not
/// carried over: only a manual exit keeps `late`.
pub fn system_close_status(overtime_scheduled: bool) -> AttendanceStatus {
    if overtime_scheduled {
        AttendanceStatus::Present
    } else {
        AttendanceStatus::EarlyLeave
    }
}

/// Decide what to do with one open session at `now`.
pub fn plan_close(
    session: &AttendanceSession,
    plan: &DayPlan,
    settings: &Settings,
    now: NaiveDateTime,
) -> CloseDecision {
    let Some(check_in) = session.check_in_at else {
        return CloseDecision::Wait;
    };
    let is_past_day = session.work_date < now.date();
    let windows = plan.windows.resolve(session.work_date);

    let Some(regular) = windows.regular else {
        if !is_past_day {
            return CloseDecision::Wait;
        }
        let hours = settings.fallback_session_hours;
        return CloseDecision::Close {
            at: check_in + hours_to_duration(hours),
            kind: CloseKind::Fallback,
            status: system_close_status(false),
            breakdown: simple_split(hours, hours, 0.0),
        };
    };

    let planned_regular = plan.planned_regular_hours();
    let planned_overtime = plan.planned_overtime_hours();
    let overtime_scheduled = planned_overtime > 0.0;

    // Overtime is appended after the regular end, not overlapped.
    let effective_end = regular.end + hours_to_duration(planned_overtime);

    let kind = if is_past_day && effective_end <= now {
        CloseKind::PastDay
    } else if now > effective_end + settings.auto_checkout_buffer {
        CloseKind::SameDay
    } else {
        return CloseDecision::Wait;
    };

    let at = effective_end.max(check_in);
    CloseDecision::Close {
        at,
        kind,
        status: system_close_status(overtime_scheduled),
        breakdown: simple_split(
            hours_between(check_in, at),
            planned_regular,
            planned_overtime,
        ),
    }
}

/// One full pass over every open session.
pub fn reconcile_open_sessions(
    conn: &mut Connection,
    settings: &Settings,
    now: NaiveDateTime,
) -> AppResult<SweepReport> {
    let open = list_open_sessions(conn)?;
    let mut report = SweepReport {
        visited: open.len(),
        ..Default::default()
    };

    for session in &open {
        match reconcile_one(conn, settings, session, now) {
            Ok(Some(closed)) => report.closed.push(closed),
            Ok(None) => report.waiting += 1,
            Err(e) => {
                tracing::error!(
                    session_id = session.id,
                    employee_id = session.employee_id,
                    error = %e,
                    "Failed to reconcile session"
                );
                report.failures.push(SweepFailure {
                    session_id: session.id,
                    error: e.to_string(),
                });
            }
        }
    }

    if !report.closed.is_empty() || !report.failures.is_empty() {
        tracing::info!(
            visited = report.visited,
            closed = report.closed.len(),
            failed = report.failures.len(),
            "Reconciliation sweep finished"
        );
    } else {
        tracing::debug!(
            visited = report.visited,
            "Reconciliation sweep: nothing to close"
        );
    }

    Ok(report)
}

fn reconcile_one(
    conn: &mut Connection,
    settings: &Settings,
    session: &AttendanceSession,
    now: NaiveDateTime,
) -> AppResult<Option<ClosedSession>> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let key = EntryKey::employee(session.project_id, session.employee_id, session.work_date);
    let plan = load_day_plan(&tx, &key)?;

    let CloseDecision::Close {
        at,
        kind,
        status,
        breakdown,
    } = plan_close(session, &plan, settings, now)
    else {
        return Ok(None);
    };

    let mut closed = session.clone();
    closed.check_out_at = Some(at);
    closed.status = status;
    closed.planned_hours = plan.planned_regular_hours();
    closed.actual_hours = breakdown.actual_hours;
    closed.overtime_hours = breakdown.overtime_hours;
    closed.notes = format!("closed by system: {}", kind.label());

    // Someone may have scanned out since the list was read.
    if !close_if_open(&tx, &closed, now)? {
        return Ok(None);
    }
    tx.commit()?;

    let notes = format!(
        "{} at {}: {}",
        kind.label(),
        format_instant(&at),
        breakdown.describe()
    );
    record_best_effort(
        conn,
        session.employee_id,
        session.project_id,
        kind.history_action(),
        &notes,
        now,
    );

    tracing::info!(
        session_id = session.id,
        employee_id = session.employee_id,
        kind = ?kind,
        closed_at = %at,
        "Session force-closed"
    );

    Ok(Some(ClosedSession {
        session_id: session.id,
        employee_id: session.employee_id,
        project_id: session.project_id,
        work_date: session.work_date,
        closed_at: at,
        kind,
        status,
        breakdown,
    }))
}
