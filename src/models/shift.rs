use crate::core::calculator::window::ShiftWindow;
use chrono::NaiveTime;
use serde::Serialize;

/// Which toggle cycle a shift type belongs to.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShiftCategory {
    Regular,
    Overtime,
}

impl ShiftCategory {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ShiftCategory::Regular => "regular",
            ShiftCategory::Overtime => "overtime",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "regular" => Some(ShiftCategory::Regular),
            "overtime" => Some(ShiftCategory::Overtime),
            _ => None,
        }
    }
}

/// A named shift definition of a project (e.g. "Day 08-16", "Mesai 16-18").
#[derive(Debug, Clone, Serialize)]
pub struct ShiftType {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub category: ShiftCategory,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_hours: f64,
    pub rank: i64,
}

impl ShiftType {
    pub fn window(&self) -> ShiftWindow {
        ShiftWindow {
            start: self.start_time,
            end: self.end_time,
            duration_hours: self.duration_hours,
        }
    }
}
