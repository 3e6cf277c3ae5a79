use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Incomplete,
    Present,
    Late,
    EarlyLeave,
    Absent,
}

impl AttendanceStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Incomplete => "incomplete",
            AttendanceStatus::Present => "present",
            AttendanceStatus::Late => "late",
            AttendanceStatus::EarlyLeave => "early_leave",
            AttendanceStatus::Absent => "absent",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "incomplete" => Some(AttendanceStatus::Incomplete),
            "present" => Some(AttendanceStatus::Present),
            "late" => Some(AttendanceStatus::Late),
            "early_leave" => Some(AttendanceStatus::EarlyLeave),
            "absent" => Some(AttendanceStatus::Absent),
            _ => None,
        }
    }
}

/// Tag stored on sweeper-created rows.
pub const SYSTEM_TAG: &str = "system";

/// One work session for (project, employee, date).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AttendanceSession {
    pub id: i64,
    pub project_id: i64,
    pub employee_id: i64,
    pub work_date: NaiveDate,
    pub check_in_at: Option<NaiveDateTime>,
    pub check_out_at: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
    pub planned_hours: f64,
    pub actual_hours: f64,
    pub overtime_hours: f64,
    pub session_tag: String,
    pub notes: String,
}

impl AttendanceSession {
    pub fn is_open(&self) -> bool {
        self.check_in_at.is_some() && self.check_out_at.is_none()
    }

    pub fn is_closed(&self) -> bool {
        self.check_out_at.is_some()
    }
}
