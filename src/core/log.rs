use crate::db::history::list_history;
use crate::db::log::load_log;
use crate::errors::AppResult;
use crate::utils::time::format_instant;
use ansi_term::Colour;
use rusqlite::Connection;

/// Color for an operator-log operation or a history action.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "entry" => Colour::Green,
        "exit" => Colour::Cyan,
        "auto_checkout" => Colour::Yellow,
        "past_day_checkout" => Colour::RGB(255, 153, 51),
        "marked_absent" => Colour::Red,
        "migration_applied" => Colour::Purple,
        "init" | "directory" => Colour::Blue,
        _ => Colour::White,
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

pub struct LogLogic;

impl LogLogic {
    /// Print the operator log (migrations, init, directory changes).
    pub fn print_log(conn: &Connection) -> AppResult<()> {
        let entries = load_log(conn)?;
        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|(id, ..)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let op_w = entries
            .iter()
            .map(|(_, _, op, target, _)| op.len() + target.len() + 3)
            .max()
            .unwrap_or(10)
            .min(60);

        println!("📜 Internal log:\n");

        for (id, date, operation, target, message) in entries {
            let op_target = if target.is_empty() {
                operation.clone()
            } else {
                truncate(&format!("{operation} ({target})"), 60)
            };
            let padding = " ".repeat(op_w.saturating_sub(op_target.len()));
            let colored = color_for_operation(&operation).paint(op_target);

            println!(
                "{:>id_w$}: {} | {}{} => {}",
                id,
                date,
                colored,
                padding,
                message,
                id_w = id_w
            );
        }

        Ok(())
    }

    /// Print the attendance audit trail, newest first.
    pub fn print_history(
        conn: &Connection,
        employee_id: Option<i64>,
        limit: usize,
    ) -> AppResult<()> {
        let entries = list_history(conn, employee_id, limit)?;
        if entries.is_empty() {
            println!("🗂️  No history entries.");
            return Ok(());
        }

        println!("🗂️  Attendance history:\n");
        for h in entries {
            let action = format!("{:<18}", h.action);
            println!(
                "{} | emp {:>4} | proj {:>3} | {} => {}",
                format_instant(&h.performed_at),
                h.employee_id,
                h.project_id,
                color_for_operation(&h.action).paint(action),
                h.notes
            );
        }
        Ok(())
    }
}
