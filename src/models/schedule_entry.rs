use chrono::NaiveDate;
use serde::Serialize;

/// Who a schedule cell belongs to: a named employee or an unassigned
/// "joker" slot of the project.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Slot {
    Employee(i64),
    Joker(i64),
}

impl Slot {
    pub fn employee_id(&self) -> Option<i64> {
        match self {
            Slot::Employee(id) => Some(*id),
            Slot::Joker(_) => None,
        }
    }

    pub fn joker_slot(&self) -> Option<i64> {
        match self {
            Slot::Joker(n) => Some(*n),
            Slot::Employee(_) => None,
        }
    }
}

/// Identity of one schedule cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryKey {
    pub project_id: i64,
    pub slot: Slot,
    pub date: NaiveDate,
}

impl EntryKey {
    pub fn employee(project_id: i64, employee_id: i64, date: NaiveDate) -> Self {
        Self {
            project_id,
            slot: Slot::Employee(employee_id),
            date,
        }
    }

    pub fn joker(project_id: i64, slot: i64, date: NaiveDate) -> Self {
        Self {
            project_id,
            slot: Slot::Joker(slot),
            date,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    Annual,
    Sick,
    Excused,
    Unpaid,
    Compensatory,
}

impl LeaveType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            LeaveType::Annual => "annual",
            LeaveType::Sick => "sick",
            LeaveType::Excused => "excused",
            LeaveType::Unpaid => "unpaid",
            LeaveType::Compensatory => "compensatory",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "annual" => Some(LeaveType::Annual),
            "sick" => Some(LeaveType::Sick),
            "excused" => Some(LeaveType::Excused),
            "unpaid" => Some(LeaveType::Unpaid),
            "compensatory" => Some(LeaveType::Compensatory),
            _ => None,
        }
    }
}

/// One planned day for a (project, slot) pair.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScheduleEntry {
    pub id: i64,
    pub project_id: i64,
    pub employee_id: Option<i64>,
    pub joker_slot: Option<i64>,
    pub work_date: NaiveDate,
    pub regular_type_id: Option<i64>,
    pub regular_hours: f64,
    pub leave_type: Option<LeaveType>,
    pub overtime_type_id: Option<i64>,
    pub overtime_hours: f64,
    pub notes: String,
}

impl ScheduleEntry {
    /// Unsaved blank cell for a key (`id == 0`).
    pub fn blank(key: &EntryKey) -> Self {
        Self {
            id: 0,
            project_id: key.project_id,
            employee_id: key.slot.employee_id(),
            joker_slot: key.slot.joker_slot(),
            work_date: key.date,
            regular_type_id: None,
            regular_hours: 0.0,
            leave_type: None,
            overtime_type_id: None,
            overtime_hours: 0.0,
            notes: String::new(),
        }
    }

    pub fn set_regular(&mut self, type_id: i64, hours: f64) {
        self.regular_type_id = Some(type_id);
        self.regular_hours = hours;
        self.leave_type = None;
    }

    pub fn clear_regular(&mut self) {
        self.regular_type_id = None;
        self.regular_hours = 0.0;
    }

    /// Leave pre-empts work: the regular window is always dropped.
    pub fn set_leave(&mut self, leave: Option<LeaveType>) {
        self.clear_regular();
        self.leave_type = leave;
    }

    pub fn set_overtime(&mut self, type_id: Option<i64>, hours: f64) {
        self.overtime_type_id = type_id;
        self.overtime_hours = if type_id.is_some() { hours } else { 0.0 };
    }
}
