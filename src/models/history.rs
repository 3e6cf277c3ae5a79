use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Entry,
    Exit,
    AutoCheckout,
    PastDayCheckout,
    MarkedAbsent,
}

impl HistoryAction {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            HistoryAction::Entry => "entry",
            HistoryAction::Exit => "exit",
            HistoryAction::AutoCheckout => "auto_checkout",
            HistoryAction::PastDayCheckout => "past_day_checkout",
            HistoryAction::MarkedAbsent => "marked_absent",
        }
    }
}

/// Append-only audit record of an attendance transition.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub employee_id: i64,
    pub project_id: i64,
    pub action: String,
    pub notes: String,
    pub performed_at: NaiveDateTime,
}
