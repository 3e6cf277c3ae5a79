//! Schedule toggle engine.
//!
//! A day cell cycles `off -> type_1 -> ... -> type_n -> off` over the
//! project's regular shift types ordered by rank. The overtime side has its
//! own cycle over the overtime types; the two never reset each other.

use crate::db::directory::{get_employee, list_shift_types, require_project};
use crate::db::schedule::{find_entry, save_entry};
use crate::errors::{AppError, AppResult};
use crate::models::schedule_entry::{EntryKey, LeaveType, ScheduleEntry, Slot};
use crate::models::shift::{ShiftCategory, ShiftType};
use chrono::NaiveDateTime;
use rusqlite::{Connection, TransactionBehavior};

/// Position after `current` in a cycle of `len` types; `None` is "off".
pub fn next_in_cycle(current: Option<usize>, len: usize) -> Option<usize> {
    match current {
        _ if len == 0 => None,
        None => Some(0),
        Some(i) if i + 1 < len => Some(i + 1),
        Some(_) => None,
    }
}

/// Advance (or jump, when `explicit_shift_type_id` is given) the regular side
/// of a cell. Setting a type clears any leave.
pub fn toggle(
    conn: &mut Connection,
    key: &EntryKey,
    explicit_shift_type_id: Option<i64>,
    now: NaiveDateTime,
) -> AppResult<ScheduleEntry> {
    let entry = mutate_entry(conn, key, now, |tx, entry| {
        let types = list_shift_types(tx, key.project_id, Some(ShiftCategory::Regular))?;
        match pick(&types, entry.regular_type_id, explicit_shift_type_id, key)? {
            Some(st) => entry.set_regular(st.id, st.duration_hours),
            None => entry.clear_regular(),
        }
        Ok(())
    })?;

    tracing::debug!(
        project_id = key.project_id,
        date = %key.date,
        regular_type_id = ?entry.regular_type_id,
        "Regular shift toggled"
    );
    Ok(entry)
}

/// Same as [`toggle`] for the overtime side.
pub fn set_overtime_type(
    conn: &mut Connection,
    key: &EntryKey,
    explicit_shift_type_id: Option<i64>,
    now: NaiveDateTime,
) -> AppResult<ScheduleEntry> {
    let entry = mutate_entry(conn, key, now, |tx, entry| {
        let types = list_shift_types(tx, key.project_id, Some(ShiftCategory::Overtime))?;
        match pick(&types, entry.overtime_type_id, explicit_shift_type_id, key)? {
            Some(st) => entry.set_overtime(Some(st.id), st.duration_hours),
            None => entry.set_overtime(None, 0.0),
        }
        Ok(())
    })?;

    tracing::debug!(
        project_id = key.project_id,
        date = %key.date,
        overtime_type_id = ?entry.overtime_type_id,
        "Overtime shift toggled"
    );
    Ok(entry)
}

/// Drop the overtime assignment of a cell.
pub fn clear_overtime(
    conn: &mut Connection,
    key: &EntryKey,
    now: NaiveDateTime,
) -> AppResult<ScheduleEntry> {
    mutate_entry(conn, key, now, |_, entry| {
        entry.set_overtime(None, 0.0);
        Ok(())
    })
}

/// Assign (or with `None`, clear) a leave. The regular window is always
/// cleared.
pub fn set_leave_type(
    conn: &mut Connection,
    key: &EntryKey,
    leave: Option<LeaveType>,
    now: NaiveDateTime,
) -> AppResult<ScheduleEntry> {
    mutate_entry(conn, key, now, |_, entry| {
        entry.set_leave(leave);
        Ok(())
    })
}

pub fn set_notes(
    conn: &mut Connection,
    key: &EntryKey,
    notes: &str,
    now: NaiveDateTime,
) -> AppResult<ScheduleEntry> {
    mutate_entry(conn, key, now, |_, entry| {
        entry.notes = notes.to_string();
        Ok(())
    })
}

/// Next type in the cycle, or the explicitly requested one.
fn pick<'a>(
    types: &'a [ShiftType],
    current_id: Option<i64>,
    explicit_id: Option<i64>,
    key: &EntryKey,
) -> AppResult<Option<&'a ShiftType>> {
    if let Some(id) = explicit_id {
        return types.iter().find(|t| t.id == id).map(Some).ok_or_else(|| {
            AppError::NotFound(format!(
                "shift type {} in project {}",
                id, key.project_id
            ))
        });
    }

    let current = current_id.and_then(|id| types.iter().position(|t| t.id == id));
    Ok(next_in_cycle(current, types.len()).map(|i| &types[i]))
}

fn validate_key(conn: &Connection, key: &EntryKey) -> AppResult<()> {
    require_project(conn, key.project_id)?;
    match key.slot {
        Slot::Employee(id) => {
            get_employee(conn, id)?.ok_or_else(|| AppError::NotFound(format!("employee {id}")))?;
        }
        Slot::Joker(n) if n <= 0 => {
            return Err(AppError::Validation(
                "joker slot numbers start at 1".into(),
            ));
        }
        Slot::Joker(_) => {}
    }
    Ok(())
}

/// Find-or-create the cell and apply `f` under the write lock.
fn mutate_entry<F>(
    conn: &mut Connection,
    key: &EntryKey,
    now: NaiveDateTime,
    f: F,
) -> AppResult<ScheduleEntry>
where
    F: FnOnce(&Connection, &mut ScheduleEntry) -> AppResult<()>,
{
    validate_key(conn, key)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut entry = find_entry(&tx, key)?.unwrap_or_else(|| ScheduleEntry::blank(key));
    f(&*tx, &mut entry)?;
    let saved = save_entry(&tx, &entry, now)?;
    tx.commit()?;
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::next_in_cycle;

    #[test]
    fn cycle_wraps_back_to_off() {
        assert_eq!(next_in_cycle(None, 3), Some(0));
        assert_eq!(next_in_cycle(Some(0), 3), Some(1));
        assert_eq!(next_in_cycle(Some(2), 3), None);
        assert_eq!(next_in_cycle(None, 0), None);
    }
}
