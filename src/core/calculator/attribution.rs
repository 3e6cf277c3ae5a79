//! Splitting worked hours between the regular and overtime buckets.
//!
//! Two policies: when an overtime window is scheduled the
//! worked interval is intersected with each window; without one, hours past
//! the planned regular amount count as overtime.

use super::window::{InstantRange, ResolvedWindows, hours_between};
use crate::utils::time::round2;
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttributionPolicy {
    WindowOverlap,
    SimpleSplit,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct HourBreakdown {
    pub policy: AttributionPolicy,
    pub actual_hours: f64,
    pub planned_regular_hours: f64,
    pub planned_overtime_hours: f64,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    /// Worked time outside both windows (overlap policy only).
    pub unattributed_hours: f64,
}

impl HourBreakdown {
    pub fn describe(&self) -> String {
        format!(
            "actual={:.2}h regular={:.2}h overtime={:.2}h unattributed={:.2}h planned={:.2}h+{:.2}h policy={:?}",
            self.actual_hours,
            self.regular_hours,
            self.overtime_hours,
            self.unattributed_hours,
            self.planned_regular_hours,
            self.planned_overtime_hours,
            self.policy,
        )
    }
}

/// Attribute the interval `[check_in, check_out)` to the day's windows.
pub fn attribute_hours(
    check_in: NaiveDateTime,
    check_out: NaiveDateTime,
    windows: &ResolvedWindows,
    planned_regular_hours: f64,
    planned_overtime_hours: f64,
) -> HourBreakdown {
    let actual = hours_between(check_in, check_out);

    let Some(overtime_window) = windows.overtime else {
        return simple_split(actual, planned_regular_hours, planned_overtime_hours);
    };

    let worked = InstantRange::new(check_in, check_out);
    let regular = windows
        .regular
        .map(|w| worked.overlap_hours(&w))
        .unwrap_or(0.0);
    let overtime = worked.overlap_hours(&overtime_window);

    HourBreakdown {
        policy: AttributionPolicy::WindowOverlap,
        actual_hours: actual,
        planned_regular_hours,
        planned_overtime_hours,
        regular_hours: regular,
        overtime_hours: overtime,
        unattributed_hours: round2((actual - regular - overtime).max(0.0)),
    }
}

/// `regular = min(actual, planned)`, `overtime = max(0, actual - planned)`.
pub fn simple_split(
    actual_hours: f64,
    planned_regular_hours: f64,
    planned_overtime_hours: f64,
) -> HourBreakdown {
    HourBreakdown {
        policy: AttributionPolicy::SimpleSplit,
        actual_hours,
        planned_regular_hours,
        planned_overtime_hours,
        regular_hours: round2(actual_hours.min(planned_regular_hours)),
        overtime_hours: round2((actual_hours - planned_regular_hours).max(0.0)),
        unattributed_hours: 0.0,
    }
}
