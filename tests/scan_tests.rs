use guardshift::config::Settings;
use guardshift::core::absence::mark_absences;
use guardshift::core::calculator::attribution::AttributionPolicy;
use guardshift::core::calculator::context::ScanContext;
use guardshift::core::reconcile::reconcile_open_sessions;
use guardshift::core::scan::ScanOutcome;
use guardshift::db::attendance::find_session;
use guardshift::db::directory::{insert_employee, set_employee_active};
use guardshift::db::history::list_history;
use guardshift::errors::{AppError, ConflictKind};
use guardshift::models::attendance::AttendanceStatus;
use guardshift::models::scan_type::ScanType::{Entry, Exit};

mod common;
use common::{approx, at, date, mem_db, scan, schedule, seed_site};

fn entry_of(outcome: ScanOutcome) -> guardshift::core::scan::EntryOutcome {
    match outcome {
        ScanOutcome::Entry(o) => o,
        other => panic!("expected entry outcome, got {:?}", other),
    }
}

fn exit_of(outcome: ScanOutcome) -> guardshift::core::scan::ExitOutcome {
    match outcome {
        ScanOutcome::Exit(o) => o,
        other => panic!("expected exit outcome, got {:?}", other),
    }
}

#[test]
fn day_with_evening_overtime_splits_hours_by_window() {
    let mut pool = mem_db();
    let conn = &mut pool.conn;
    let s = seed_site(conn);
    schedule(conn, s.project, s.employee, "2025-05-01", &s.day, Some(&s.evening_ot));

    let entry = entry_of(scan(conn, s.project, s.employee, Entry, "2025-05-01 09:05").unwrap());
    assert_eq!(entry.context, ScanContext::Regular);
    assert!(!entry.late);
    assert_eq!(entry.session.status, AttendanceStatus::Incomplete);

    let exit = exit_of(scan(conn, s.project, s.employee, Exit, "2025-05-01 19:10").unwrap());
    let b = exit.breakdown;
    assert_eq!(b.policy, AttributionPolicy::WindowOverlap);
    assert!(approx(b.actual_hours, 10.08, 0.001));
    assert!(approx(b.regular_hours, 8.0, 0.1));
    assert!(approx(b.overtime_hours, 2.0, 0.001));
    assert_eq!(exit.session.status, AttendanceStatus::Present);
    assert_eq!(exit.session.planned_hours, 8.0);
    assert_eq!(exit.started_in, ScanContext::Regular);

    let stored = find_session(conn, s.project, s.employee, &date("2025-05-01"))
        .unwrap()
        .unwrap();
    assert_eq!(stored.check_out_at, Some(at("2025-05-01 19:10")));
    assert_eq!(stored.overtime_hours, 2.0);
}

#[test]
fn second_entry_while_open_is_rejected() {
    let mut pool = mem_db();
    let conn = &mut pool.conn;
    let s = seed_site(conn);

    scan(conn, s.project, s.employee, Entry, "2025-05-01 09:00").unwrap();
    let err = scan(conn, s.project, s.employee, Entry, "2025-05-01 09:30").unwrap_err();
    assert!(matches!(err, AppError::Conflict(ConflictKind::AlreadyOpen)));
    assert_eq!(err.status(), 409);
    assert_eq!(err.kind(), "already_open");
}

#[test]
fn exit_without_entry_is_rejected() {
    let mut pool = mem_db();
    let conn = &mut pool.conn;
    let s = seed_site(conn);

    let err = scan(conn, s.project, s.employee, Exit, "2025-05-01 17:00").unwrap_err();
    assert!(matches!(err, AppError::Conflict(ConflictKind::NoOpenSession)));
}

#[test]
fn second_exit_is_rejected() {
    let mut pool = mem_db();
    let conn = &mut pool.conn;
    let s = seed_site(conn);

    scan(conn, s.project, s.employee, Entry, "2025-05-01 09:00").unwrap();
    scan(conn, s.project, s.employee, Exit, "2025-05-01 17:00").unwrap();
    let err = scan(conn, s.project, s.employee, Exit, "2025-05-01 17:05").unwrap_err();
    assert!(matches!(err, AppError::Conflict(ConflictKind::AlreadyClosed)));
}

#[test]
fn exit_after_closing_yesterday_is_already_closed() {
    let mut pool = mem_db();
    let conn = &mut pool.conn;
    let s = seed_site(conn);

    scan(conn, s.project, s.employee, Entry, "2025-05-01 09:00").unwrap();
    scan(conn, s.project, s.employee, Exit, "2025-05-01 17:00").unwrap();
    let err = scan(conn, s.project, s.employee, Exit, "2025-05-02 08:00").unwrap_err();
    assert!(matches!(err, AppError::Conflict(ConflictKind::AlreadyClosed)));

    // nothing on either day before: still no open session
    let err = scan(conn, s.project, s.employee, Exit, "2025-05-05 08:00").unwrap_err();
    assert!(matches!(err, AppError::Conflict(ConflictKind::NoOpenSession)));
}

#[test]
fn lost_history_table_does_not_undo_attendance() {
    let mut pool = mem_db();
    let conn = &mut pool.conn;
    let s = seed_site(conn);
    let forgetful = insert_employee(conn, "Ali Demir").unwrap().id;
    let missing = insert_employee(conn, "Selin Acar").unwrap().id;
    for emp in [s.employee, forgetful, missing] {
        schedule(conn, s.project, emp, "2025-05-01", &s.day, None);
    }
    conn.execute_batch("DROP TABLE history;").unwrap();

    let entry = scan(conn, s.project, s.employee, Entry, "2025-05-01 09:00").unwrap();
    assert!(entry.session().is_open());
    let exit = scan(conn, s.project, s.employee, Exit, "2025-05-01 17:00").unwrap();
    assert_eq!(exit.session().check_out_at, Some(at("2025-05-01 17:00")));

    scan(conn, s.project, forgetful, Entry, "2025-05-01 09:00").unwrap();
    let report =
        reconcile_open_sessions(conn, &Settings::default(), at("2025-05-01 17:11")).unwrap();
    assert_eq!(report.closed.len(), 1);
    assert!(report.failures.is_empty());

    let absences = mark_absences(conn, date("2025-05-01"), at("2025-05-01 23:55")).unwrap();
    assert_eq!(absences.marked.len(), 1);
    assert_eq!(absences.marked[0].employee_id, missing);

    let day = date("2025-05-01");
    let worked = find_session(conn, s.project, s.employee, &day).unwrap().unwrap();
    assert_eq!(worked.check_out_at, Some(at("2025-05-01 17:00")));
    assert_eq!(worked.actual_hours, 8.0);

    let closed = find_session(conn, s.project, forgetful, &day).unwrap().unwrap();
    assert_eq!(closed.check_out_at, Some(at("2025-05-01 17:00")));
    assert_eq!(closed.status, AttendanceStatus::EarlyLeave);

    let absent = find_session(conn, s.project, missing, &day).unwrap().unwrap();
    assert_eq!(absent.status, AttendanceStatus::Absent);
}

#[test]
fn late_arrival_sticks_through_checkout() {
    let mut pool = mem_db();
    let conn = &mut pool.conn;
    let s = seed_site(conn);
    schedule(conn, s.project, s.employee, "2025-05-01", &s.day, None);

    let entry = entry_of(scan(conn, s.project, s.employee, Entry, "2025-05-01 09:20").unwrap());
    assert!(entry.late);
    assert_eq!(entry.session.status, AttendanceStatus::Late);

    let exit = exit_of(scan(conn, s.project, s.employee, Exit, "2025-05-01 17:00").unwrap());
    assert_eq!(exit.session.status, AttendanceStatus::Late);
}

#[test]
fn early_overtime_scan_is_classified_as_overtime() {
    let mut pool = mem_db();
    let conn = &mut pool.conn;
    let s = seed_site(conn);
    schedule(conn, s.project, s.employee, "2025-05-01", &s.day, Some(&s.morning_ot));

    let entry = entry_of(scan(conn, s.project, s.employee, Entry, "2025-05-01 06:05").unwrap());
    assert_eq!(entry.context, ScanContext::Overtime);
    assert!(!entry.late);
    assert_eq!(entry.session.session_tag, "overtime");
}

#[test]
fn simple_split_applies_without_overtime_window() {
    let mut pool = mem_db();
    let conn = &mut pool.conn;
    let s = seed_site(conn);
    schedule(conn, s.project, s.employee, "2025-05-01", &s.day, None);

    scan(conn, s.project, s.employee, Entry, "2025-05-01 09:00").unwrap();
    let exit = exit_of(scan(conn, s.project, s.employee, Exit, "2025-05-01 18:00").unwrap());
    assert_eq!(exit.breakdown.policy, AttributionPolicy::SimpleSplit);
    assert_eq!(exit.breakdown.regular_hours, 8.0);
    assert_eq!(exit.breakdown.overtime_hours, 1.0);
    assert_eq!(exit.session.overtime_hours, 1.0);
}

#[test]
fn unscheduled_day_is_unspecified() {
    let mut pool = mem_db();
    let conn = &mut pool.conn;
    let s = seed_site(conn);

    let entry = entry_of(scan(conn, s.project, s.employee, Entry, "2025-05-01 11:00").unwrap());
    assert_eq!(entry.context, ScanContext::Unspecified);
    assert_eq!(entry.session.status, AttendanceStatus::Incomplete);
    assert_eq!(entry.session.planned_hours, 0.0);
}

#[test]
fn night_shift_closes_on_previous_days_row() {
    let mut pool = mem_db();
    let conn = &mut pool.conn;
    let s = seed_site(conn);
    schedule(conn, s.project, s.employee, "2025-05-01", &s.night, None);

    scan(conn, s.project, s.employee, Entry, "2025-05-01 21:55").unwrap();
    let exit = exit_of(scan(conn, s.project, s.employee, Exit, "2025-05-02 06:05").unwrap());

    assert_eq!(exit.session.work_date, date("2025-05-01"));
    assert_eq!(exit.session.status, AttendanceStatus::Present);
    assert!(approx(exit.session.actual_hours, 8.17, 0.001));
    assert!(
        find_session(conn, s.project, s.employee, &date("2025-05-02"))
            .unwrap()
            .is_none()
    );
}

#[test]
fn exit_before_check_in_is_invalid() {
    let mut pool = mem_db();
    let conn = &mut pool.conn;
    let s = seed_site(conn);

    scan(conn, s.project, s.employee, Entry, "2025-05-01 10:00").unwrap();
    let err = scan(conn, s.project, s.employee, Exit, "2025-05-01 09:00").unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(err.status(), 400);

    // nothing was closed
    let open = find_session(conn, s.project, s.employee, &date("2025-05-01"))
        .unwrap()
        .unwrap();
    assert!(open.is_open());
}

#[test]
fn entry_after_close_reopens_the_days_row() {
    let mut pool = mem_db();
    let conn = &mut pool.conn;
    let s = seed_site(conn);

    let first = entry_of(scan(conn, s.project, s.employee, Entry, "2025-05-01 09:00").unwrap());
    scan(conn, s.project, s.employee, Exit, "2025-05-01 12:00").unwrap();
    let again = entry_of(scan(conn, s.project, s.employee, Entry, "2025-05-01 13:00").unwrap());

    assert!(again.reopened);
    assert!(!first.reopened);
    assert_eq!(again.session.id, first.session.id);
    assert!(again.session.is_open());
    assert_eq!(again.session.actual_hours, 0.0);

    let history = list_history(conn, Some(s.employee), 10).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].action, "entry");
    assert!(history[0].notes.contains("reopened"));
}

#[test]
fn entry_reuses_absent_placeholder() {
    let mut pool = mem_db();
    let conn = &mut pool.conn;
    let s = seed_site(conn);
    schedule(conn, s.project, s.employee, "2025-05-01", &s.day, None);

    let report = mark_absences(conn, date("2025-05-01"), at("2025-05-01 23:55")).unwrap();
    assert_eq!(report.marked.len(), 1);
    let absent = find_session(conn, s.project, s.employee, &date("2025-05-01"))
        .unwrap()
        .unwrap();

    let entry = entry_of(scan(conn, s.project, s.employee, Entry, "2025-05-01 23:58").unwrap());
    assert_eq!(entry.session.id, absent.id);
    assert!(!entry.reopened);
    assert_eq!(entry.session.status, AttendanceStatus::Late);
    assert_eq!(entry.session.check_in_at, Some(at("2025-05-01 23:58")));
}

#[test]
fn unknown_or_inactive_people_are_rejected() {
    let mut pool = mem_db();
    let conn = &mut pool.conn;
    let s = seed_site(conn);

    let err = scan(conn, s.project, 999, Entry, "2025-05-01 09:00").unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(err.status(), 404);

    let err = scan(conn, 999, s.employee, Entry, "2025-05-01 09:00").unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = scan(conn, 0, s.employee, Entry, "2025-05-01 09:00").unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let gone = insert_employee(conn, "Former Guard").unwrap();
    set_employee_active(conn, gone.id, false).unwrap();
    let err = scan(conn, s.project, gone.id, Entry, "2025-05-01 09:00").unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn every_transition_is_recorded() {
    let mut pool = mem_db();
    let conn = &mut pool.conn;
    let s = seed_site(conn);
    schedule(conn, s.project, s.employee, "2025-05-01", &s.day, None);

    scan(conn, s.project, s.employee, Entry, "2025-05-01 09:00").unwrap();
    scan(conn, s.project, s.employee, Exit, "2025-05-01 17:00").unwrap();

    let history = list_history(conn, Some(s.employee), 10).unwrap();
    let actions: Vec<&str> = history.iter().map(|h| h.action.as_str()).collect();
    assert_eq!(actions, vec!["exit", "entry"]);
    assert!(history[0].notes.contains("actual=8.00h"));
}
