//! Schema migrations. Each step is applied once and recorded in the `log`
//! table as `migration_applied`.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension, params};

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_directory",
        description: "Create employees, projects and shift_types",
        sql: r#"
        CREATE TABLE IF NOT EXISTS employees (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            full_name  TEXT NOT NULL,
            active     INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS projects (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            name  TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS shift_types (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id      INTEGER NOT NULL REFERENCES projects(id),
            name            TEXT NOT NULL,
            category        TEXT NOT NULL CHECK(category IN ('regular','overtime')),
            start_time      TEXT NOT NULL,
            end_time        TEXT NOT NULL,
            duration_hours  REAL NOT NULL,
            rank            INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_shift_types_project
            ON shift_types(project_id, category, rank);
        "#,
    },
    Migration {
        version: "20250301_0002_schedule",
        description: "Create schedule_entries",
        sql: r#"
        CREATE TABLE IF NOT EXISTS schedule_entries (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id        INTEGER NOT NULL REFERENCES projects(id),
            employee_id       INTEGER REFERENCES employees(id),
            joker_slot        INTEGER,
            work_date         TEXT NOT NULL,
            regular_type_id   INTEGER REFERENCES shift_types(id),
            regular_hours     REAL NOT NULL DEFAULT 0,
            leave_type        TEXT,
            overtime_type_id  INTEGER REFERENCES shift_types(id),
            overtime_hours    REAL NOT NULL DEFAULT 0,
            notes             TEXT NOT NULL DEFAULT '',
            updated_at        TEXT NOT NULL,
            CHECK ((employee_id IS NULL) <> (joker_slot IS NULL)),
            CHECK (regular_type_id IS NULL OR leave_type IS NULL)
        );

        CREATE UNIQUE INDEX IF NOT EXISTS ux_schedule_employee
            ON schedule_entries(project_id, employee_id, work_date)
            WHERE employee_id IS NOT NULL;

        CREATE UNIQUE INDEX IF NOT EXISTS ux_schedule_joker
            ON schedule_entries(project_id, joker_slot, work_date)
            WHERE employee_id IS NULL;
        "#,
    },
    Migration {
        version: "20250301_0003_attendance",
        description: "Create attendance_sessions and history",
        sql: r#"
        CREATE TABLE IF NOT EXISTS attendance_sessions (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id      INTEGER NOT NULL REFERENCES projects(id),
            employee_id     INTEGER NOT NULL REFERENCES employees(id),
            work_date       TEXT NOT NULL,
            check_in_at     TEXT,
            check_out_at    TEXT,
            status          TEXT NOT NULL
                CHECK(status IN ('incomplete','present','late','early_leave','absent')),
            planned_hours   REAL NOT NULL DEFAULT 0,
            actual_hours    REAL NOT NULL DEFAULT 0,
            overtime_hours  REAL NOT NULL DEFAULT 0,
            session_tag     TEXT NOT NULL DEFAULT '',
            notes           TEXT NOT NULL DEFAULT '',
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL,
            CHECK (check_out_at IS NULL OR status IN ('present','late','early_leave')),
            UNIQUE (project_id, employee_id, work_date)
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_open
            ON attendance_sessions(work_date)
            WHERE check_in_at IS NOT NULL AND check_out_at IS NULL;

        CREATE TABLE IF NOT EXISTS history (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id   INTEGER NOT NULL,
            project_id    INTEGER NOT NULL,
            action        TEXT NOT NULL,
            notes         TEXT NOT NULL DEFAULT '',
            performed_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_history_employee
            ON history(employee_id, performed_at);
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Public entry point: run all pending migrations. Returns how many ran.
pub fn run_pending_migrations(conn: &mut Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }

        let tx = conn.transaction()?;
        tx.execute_batch(m.sql)
            .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;
        tx.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            params![m.version, m.description],
        )?;
        tx.commit()?;

        tracing::info!(version = m.version, "Migration applied");
        applied += 1;
    }

    Ok(applied)
}
