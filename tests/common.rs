#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use guardshift::config::Settings;
use guardshift::core::scan::{ScanOutcome, ScanRequest, process_scan};
use guardshift::core::schedule::{set_overtime_type, toggle};
use guardshift::db::directory::{insert_employee, insert_project, insert_shift_type};
use guardshift::db::initialize::init_db;
use guardshift::db::pool::DbPool;
use guardshift::errors::AppResult;
use guardshift::models::scan_type::ScanType;
use guardshift::models::schedule_entry::EntryKey;
use guardshift::models::shift::{ShiftCategory, ShiftType};
use rusqlite::Connection;
use std::env;
use std::fs;
use std::path::PathBuf;

/// The binary, isolated from the developer's own config file.
pub fn gs() -> Command {
    let mut cmd = cargo_bin_cmd!("guardshift");
    cmd.env("HOME", env::temp_dir()).env("RUST_LOG", "warn");
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_guardshift.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

pub fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").expect("valid instant")
}

fn hm(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").expect("valid time")
}

/// Fresh in-memory database with the full schema.
pub fn mem_db() -> DbPool {
    let mut pool = DbPool::in_memory().expect("open in-memory db");
    init_db(&mut pool.conn).expect("migrate");
    pool
}

/// One project, one employee and the usual shift catalogue:
/// regular Day 09-17 and Night 22-06, overtime Evening 17-19 and Morning 06-08.
pub struct Site {
    pub project: i64,
    pub employee: i64,
    pub day: ShiftType,
    pub night: ShiftType,
    pub evening_ot: ShiftType,
    pub morning_ot: ShiftType,
}

pub fn seed_site(conn: &Connection) -> Site {
    let project = insert_project(conn, "Harbour Gate").expect("project").id;
    let employee = insert_employee(conn, "Deniz Kaya").expect("employee").id;

    let shift = |name: &str, cat: ShiftCategory, start: &str, end: &str, rank: i64| {
        insert_shift_type(conn, project, name, cat, hm(start), hm(end), 8.0, rank)
            .expect("shift type")
    };
    let day = shift("Day", ShiftCategory::Regular, "09:00", "17:00", 1);
    let night = shift("Night", ShiftCategory::Regular, "22:00", "06:00", 2);

    let overtime = |name: &str, start: &str, end: &str, rank: i64| {
        insert_shift_type(
            conn,
            project,
            name,
            ShiftCategory::Overtime,
            hm(start),
            hm(end),
            2.0,
            rank,
        )
        .expect("overtime type")
    };
    let evening_ot = overtime("Evening", "17:00", "19:00", 1);
    let morning_ot = overtime("Morning", "06:00", "08:00", 2);

    Site {
        project,
        employee,
        day,
        night,
        evening_ot,
        morning_ot,
    }
}

/// Schedule `employee` on `day` with the given regular and optional overtime type.
pub fn schedule(
    conn: &mut Connection,
    project: i64,
    employee: i64,
    day: &str,
    regular: &ShiftType,
    overtime: Option<&ShiftType>,
) {
    let key = EntryKey::employee(project, employee, date(day));
    let now = at("2025-04-30 12:00");
    toggle(conn, &key, Some(regular.id), now).expect("toggle");
    if let Some(ot) = overtime {
        set_overtime_type(conn, &key, Some(ot.id), now).expect("overtime");
    }
}

pub fn scan(
    conn: &mut Connection,
    project: i64,
    employee: i64,
    scan_type: ScanType,
    when: &str,
) -> AppResult<ScanOutcome> {
    let req = ScanRequest {
        project_id: project,
        employee_id: employee,
        scan_type,
        occurred_at: at(when),
    };
    process_scan(conn, &Settings::default(), &req)
}

pub fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}
