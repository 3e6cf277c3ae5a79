use chrono::NaiveTime;
use guardshift::config::Settings;
use guardshift::core::clock::{Clock, FixedClock};
use guardshift::db::attendance::find_session;
use guardshift::models::attendance::AttendanceStatus;
use guardshift::models::scan_type::ScanType::Entry;
use guardshift::worker::{AbsenceSweeper, Reconciler, run_workers};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

mod common;
use common::{at, date, mem_db, scan, schedule, seed_site};

/// Shared in-memory database with one employee on the day shift of 2025-05-01,
/// checked in at 09:00.
fn site_with_open_session() -> (guardshift::db::pool::SharedPool, i64, i64) {
    let mut pool = mem_db();
    let conn = &mut pool.conn;
    let s = seed_site(conn);
    schedule(conn, s.project, s.employee, "2025-05-01", &s.day, Some(&s.evening_ot));
    scan(conn, s.project, s.employee, Entry, "2025-05-01 09:00").unwrap();
    (pool.into_shared(), s.project, s.employee)
}

#[tokio::test]
async fn tick_uses_the_injected_clock() {
    let (pool, project, employee) = site_with_open_session();
    let clock = Arc::new(FixedClock::new(at("2025-05-01 18:00")));
    let reconciler = Reconciler::new(
        pool.clone(),
        clock.clone(),
        Settings::default(),
        Duration::from_secs(300),
    );

    let report = reconciler.tick().await.unwrap().expect("sweep ran");
    assert_eq!(report.waiting, 1);

    clock.advance(chrono::Duration::minutes(71));
    assert_eq!(clock.now(), at("2025-05-01 19:11"));
    let report = reconciler.tick().await.unwrap().expect("sweep ran");
    assert_eq!(report.closed.len(), 1);

    let guard = pool.lock().unwrap();
    let row = find_session(&guard.conn, project, employee, &date("2025-05-01"))
        .unwrap()
        .unwrap();
    assert_eq!(row.status, AttendanceStatus::Present);
}

#[tokio::test]
async fn concurrent_ticks_never_close_twice() {
    let (pool, _, _) = site_with_open_session();
    let clock = Arc::new(FixedClock::new(at("2025-05-02 08:00")));
    let reconciler = Reconciler::new(pool, clock, Settings::default(), Duration::from_secs(300));

    let (a, b) = tokio::join!(reconciler.tick(), reconciler.tick());
    let closed: usize = [a.unwrap(), b.unwrap()]
        .iter()
        .flatten()
        .map(|r| r.closed.len())
        .sum();
    assert_eq!(closed, 1);

    // the flag is released afterwards
    assert!(reconciler.tick().await.unwrap().is_some());
}

#[tokio::test]
async fn run_loop_sweeps_until_cancelled() {
    let (pool, project, employee) = site_with_open_session();
    let clock = Arc::new(FixedClock::new(at("2025-05-01 20:00")));
    let reconciler = Reconciler::new(
        pool.clone(),
        clock,
        Settings::default(),
        Duration::from_millis(20),
    );

    let cancel = CancellationToken::new();
    let task = {
        let cancel = cancel.clone();
        tokio::spawn(async move { reconciler.run(cancel).await })
    };

    tokio::time::sleep(Duration::from_millis(200)).await;
    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("reconciler stops on cancel")
        .unwrap();

    let guard = pool.lock().unwrap();
    let row = find_session(&guard.conn, project, employee, &date("2025-05-01"))
        .unwrap()
        .unwrap();
    assert!(row.is_closed());
}

#[tokio::test]
async fn absence_sweeper_marks_the_requested_day() {
    let mut pool = mem_db();
    let conn = &mut pool.conn;
    let s = seed_site(conn);
    schedule(conn, s.project, s.employee, "2025-05-01", &s.day, None);
    let pool = pool.into_shared();

    let clock = Arc::new(FixedClock::new(at("2025-05-01 23:55")));
    let sweeper = AbsenceSweeper::new(
        pool.clone(),
        clock,
        NaiveTime::from_hms_opt(23, 55, 0).unwrap(),
    );

    let report = sweeper.sweep(date("2025-05-01")).await.unwrap();
    assert_eq!(report.marked.len(), 1);

    let guard = pool.lock().unwrap();
    let row = find_session(&guard.conn, s.project, s.employee, &date("2025-05-01"))
        .unwrap()
        .unwrap();
    assert_eq!(row.status, AttendanceStatus::Absent);
}

#[tokio::test]
async fn workers_shut_down_together() {
    let (pool, _, _) = site_with_open_session();
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(at("2025-05-01 10:00")));
    let reconciler = Reconciler::new(
        pool.clone(),
        clock.clone(),
        Settings::default(),
        Duration::from_secs(300),
    );
    let sweeper = AbsenceSweeper::new(pool, clock, NaiveTime::from_hms_opt(23, 55, 0).unwrap());

    let cancel = CancellationToken::new();
    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), run_workers(reconciler, sweeper, cancel))
        .await
        .expect("workers stop")
        .unwrap();
}
