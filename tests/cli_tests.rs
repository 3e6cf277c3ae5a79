use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{gs, setup_test_db};

/// init + project 1, employee 1, Day (1) and Evening overtime (2).
fn init_site(db_path: &str) {
    gs().args(["--db", db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    gs().args(["--db", db_path, "add-project", "Harbour Gate"])
        .assert()
        .success()
        .stdout(contains("Project 1 added"));

    gs().args(["--db", db_path, "add-employee", "Deniz Kaya"])
        .assert()
        .success()
        .stdout(contains("Employee 1 added"));

    gs().args([
        "--db", db_path, "add-shift", "1", "Day", "--start", "09:00", "--end", "17:00",
    ])
    .assert()
    .success()
    .stdout(contains("Shift type 1 added"));

    gs().args([
        "--db",
        db_path,
        "add-shift",
        "1",
        "Evening",
        "--start",
        "17:00",
        "--end",
        "19:00",
        "--overtime",
    ])
    .assert()
    .success()
    .stdout(contains("Shift type 2 added").and(contains("02h 00m")));
}

#[test]
fn test_full_day_through_the_cli() {
    let db_path = setup_test_db("cli_full_day");
    init_site(&db_path);

    gs().args(["--db", &db_path, "toggle", "1", "2025-05-01", "--employee", "1"])
        .assert()
        .success()
        .stdout(contains("Day"));

    gs().args(["--db", &db_path, "overtime", "1", "2025-05-01", "--employee", "1"])
        .assert()
        .success()
        .stdout(contains("Evening"));

    gs().args(["--db", &db_path, "schedule", "1", "2025-05-01"])
        .assert()
        .success()
        .stdout(contains("employee 1").and(contains("Evening")));

    gs().args([
        "--db",
        &db_path,
        "scan",
        "1",
        "1",
        "entry",
        "--at",
        "2025-05-01 09:05",
    ])
    .assert()
    .success()
    .stdout(contains("checked in").and(contains("regular")));

    gs().args([
        "--db",
        &db_path,
        "scan",
        "1",
        "1",
        "exit",
        "--at",
        "2025-05-01 19:10",
    ])
    .assert()
    .success()
    .stdout(contains("checked out").and(contains("present")));

    gs().args(["--db", &db_path, "list", "2025-05-01"])
        .assert()
        .success()
        .stdout(contains("present").and(contains("09:05")));

    gs().args(["--db", &db_path, "log"])
        .assert()
        .success()
        .stdout(contains("entry").and(contains("exit")));
}

#[test]
fn test_conflicting_scan_fails() {
    let db_path = setup_test_db("cli_conflict");
    init_site(&db_path);

    gs().args([
        "--db",
        &db_path,
        "scan",
        "1",
        "1",
        "in",
        "--at",
        "2025-05-01 09:00",
    ])
    .assert()
    .success();

    gs().args([
        "--db",
        &db_path,
        "scan",
        "1",
        "1",
        "in",
        "--at",
        "2025-05-01 09:10",
    ])
    .assert()
    .failure()
    .stderr(contains("already open"));

    gs().args([
        "--db",
        &db_path,
        "--json",
        "scan",
        "1",
        "1",
        "entry",
        "--at",
        "2025-05-01 09:20",
    ])
    .assert()
    .failure()
    .stdout(contains("\"kind\": \"already_open\"").and(contains("\"status\": 409")));
}

#[test]
fn test_bad_input_is_rejected() {
    let db_path = setup_test_db("cli_bad_input");
    init_site(&db_path);

    gs().args(["--db", &db_path, "scan", "1", "1", "sideways"])
        .assert()
        .failure()
        .stderr(contains("scan type"));

    gs().args(["--db", &db_path, "toggle", "1", "2025-13-01", "--employee", "1"])
        .assert()
        .failure()
        .stderr(contains("Invalid date"));

    // slot is mandatory
    gs().args(["--db", &db_path, "toggle", "1", "2025-05-01"])
        .assert()
        .failure();

    gs().args([
        "--db",
        &db_path,
        "leave",
        "1",
        "2025-05-01",
        "--employee",
        "1",
        "--type",
        "holiday",
    ])
    .assert()
    .failure()
    .stderr(contains("unknown leave type"));
}

#[test]
fn test_reconcile_and_absences_json() {
    let db_path = setup_test_db("cli_sweeps");
    init_site(&db_path);

    gs().args(["--db", &db_path, "add-employee", "Ali Demir"])
        .assert()
        .success();

    for emp in ["1", "2"] {
        gs().args([
            "--db",
            &db_path,
            "toggle",
            "1",
            "2025-05-01",
            "--employee",
            emp,
            "--shift",
            "1",
        ])
        .assert()
        .success();
    }

    gs().args([
        "--db",
        &db_path,
        "scan",
        "1",
        "1",
        "entry",
        "--at",
        "2025-05-01 08:58",
    ])
    .assert()
    .success();

    gs().args(["--db", &db_path, "--json", "absences", "2025-05-01"])
        .assert()
        .success()
        .stdout(contains("\"employee_id\": 2").and(contains("\"scheduled\": 2")));

    gs().args([
        "--db",
        &db_path,
        "--json",
        "reconcile",
        "--at",
        "2025-05-02 07:00",
    ])
    .assert()
    .success()
    .stdout(contains("\"kind\": \"past_day\"").and(contains("\"early_leave\"")));

    gs().args(["--db", &db_path, "list", "2025-05-01"])
        .assert()
        .success()
        .stdout(contains("absent").and(contains("early_leave")));
}

#[test]
fn test_leave_and_shift_listing() {
    let db_path = setup_test_db("cli_leave");
    init_site(&db_path);

    gs().args([
        "--db",
        &db_path,
        "leave",
        "1",
        "2025-05-03",
        "--joker",
        "1",
        "--type",
        "sick",
    ])
    .assert()
    .success()
    .stdout(contains("joker #1").and(contains("leave: sick")));

    gs().args(["--db", &db_path, "shifts", "1"])
        .assert()
        .success()
        .stdout(contains("Day").and(contains("overtime")));

    gs().args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied"));
}
