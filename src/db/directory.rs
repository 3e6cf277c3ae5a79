//! Employees, projects and shift types: the records the attendance core
//! reads but never mutates.

use crate::db::db_utils::{enum_col, time_col};
use crate::errors::{AppError, AppResult};
use crate::models::directory::{Employee, Project};
use crate::models::shift::{ShiftCategory, ShiftType};
use crate::utils::time::format_time;
use chrono::NaiveTime;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn insert_employee(conn: &Connection, full_name: &str) -> AppResult<Employee> {
    conn.execute(
        "INSERT INTO employees (full_name, active) VALUES (?1, 1)",
        [full_name],
    )?;
    Ok(Employee {
        id: conn.last_insert_rowid(),
        full_name: full_name.to_string(),
        active: true,
    })
}

pub fn set_employee_active(conn: &Connection, id: i64, active: bool) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE employees SET active = ?1 WHERE id = ?2",
        params![active, id],
    )?;
    if n == 0 {
        return Err(AppError::NotFound(format!("employee {id}")));
    }
    Ok(())
}

pub fn get_employee(conn: &Connection, id: i64) -> AppResult<Option<Employee>> {
    let emp = conn
        .query_row(
            "SELECT id, full_name, active FROM employees WHERE id = ?1",
            [id],
            |row| {
                Ok(Employee {
                    id: row.get("id")?,
                    full_name: row.get("full_name")?,
                    active: row.get("active")?,
                })
            },
        )
        .optional()?;
    Ok(emp)
}

pub fn insert_project(conn: &Connection, name: &str) -> AppResult<Project> {
    conn.execute("INSERT INTO projects (name) VALUES (?1)", [name])?;
    Ok(Project {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    })
}

pub fn get_project(conn: &Connection, id: i64) -> AppResult<Option<Project>> {
    let project = conn
        .query_row("SELECT id, name FROM projects WHERE id = ?1", [id], |row| {
            Ok(Project {
                id: row.get("id")?,
                name: row.get("name")?,
            })
        })
        .optional()?;
    Ok(project)
}

pub fn require_project(conn: &Connection, id: i64) -> AppResult<Project> {
    get_project(conn, id)?.ok_or_else(|| AppError::NotFound(format!("project {id}")))
}

#[allow(clippy::too_many_arguments)]
pub fn insert_shift_type(
    conn: &Connection,
    project_id: i64,
    name: &str,
    category: ShiftCategory,
    start_time: NaiveTime,
    end_time: NaiveTime,
    duration_hours: f64,
    rank: i64,
) -> AppResult<ShiftType> {
    conn.execute(
        "INSERT INTO shift_types
            (project_id, name, category, start_time, end_time, duration_hours, rank)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            project_id,
            name,
            category.to_db_str(),
            format_time(&start_time),
            format_time(&end_time),
            duration_hours,
            rank,
        ],
    )?;
    Ok(ShiftType {
        id: conn.last_insert_rowid(),
        project_id,
        name: name.to_string(),
        category,
        start_time,
        end_time,
        duration_hours,
        rank,
    })
}

fn map_shift_type(row: &Row) -> rusqlite::Result<ShiftType> {
    Ok(ShiftType {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        name: row.get("name")?,
        category: enum_col(row, "category", ShiftCategory::from_db_str)?,
        start_time: time_col(row, "start_time")?,
        end_time: time_col(row, "end_time")?,
        duration_hours: row.get("duration_hours")?,
        rank: row.get("rank")?,
    })
}

pub fn get_shift_type(conn: &Connection, id: i64) -> AppResult<Option<ShiftType>> {
    let st = conn
        .query_row(
            "SELECT * FROM shift_types WHERE id = ?1",
            [id],
            map_shift_type,
        )
        .optional()?;
    Ok(st)
}

/// Shift types of a project in toggle order (rank, then id).
pub fn list_shift_types(
    conn: &Connection,
    project_id: i64,
    category: Option<ShiftCategory>,
) -> AppResult<Vec<ShiftType>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM shift_types
         WHERE project_id = ?1 AND (?2 IS NULL OR category = ?2)
         ORDER BY rank ASC, id ASC",
    )?;
    let rows = stmt.query_map(
        params![project_id, category.map(|c| c.to_db_str())],
        map_shift_type,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
