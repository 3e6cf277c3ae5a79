//! Time-window primitives shared by the scan processor, the reconciler and
//! the absence sweeper.
//!
//! Everything here is pure: instants are wall-clock `NaiveDateTime` values
//! in the single configured zone, and a window side may be missing.

use crate::utils::time::{parse_time, round2};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Day-relative shift boundaries. `end < start` means the window crosses
/// midnight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShiftWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub duration_hours: f64,
}

impl ShiftWindow {
    /// Build a window whose duration is derived from its boundaries.
    pub fn from_times(start: NaiveTime, end: NaiveTime) -> Self {
        let base = NaiveDate::default();
        let s = base.and_time(start);
        let e = normalize_cross_midnight(s, base.and_time(end));
        Self {
            start,
            end,
            duration_hours: hours_between(s, e),
        }
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end < self.start
    }

    /// Absolute range of this window when it starts on `date`.
    pub fn on(&self, date: NaiveDate) -> InstantRange {
        let start = date.and_time(self.start);
        let end = normalize_cross_midnight(start, date.and_time(self.end));
        InstantRange { start, end }
    }
}

/// Half-open absolute time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InstantRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl InstantRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn overlap_minutes(&self, other: &InstantRange) -> f64 {
        overlap_minutes(self.start, self.end, other.start, other.end)
    }

    pub fn overlap_hours(&self, other: &InstantRange) -> f64 {
        round2(self.overlap_minutes(other) / 60.0)
    }
}

/// `date` + `"HH:MM:SS"` to an instant. A missing or unparsable side yields
/// `None`.
pub fn to_instant(date: NaiveDate, time: Option<&str>) -> Option<NaiveDateTime> {
    time.and_then(parse_time).map(|t| date.and_time(t))
}

/// Push `end` one day forward when it lies before `start`.
pub fn normalize_cross_midnight(start: NaiveDateTime, end: NaiveDateTime) -> NaiveDateTime {
    if end < start {
        end + Duration::hours(24)
    } else {
        end
    }
}

/// Minutes shared by `[a_start, a_end)` and `[b_start, b_end)`; zero for
/// disjoint, touching or degenerate ranges.
pub fn overlap_minutes(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> f64 {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    if end <= start {
        return 0.0;
    }
    (end - start).num_seconds() as f64 / 60.0
}

/// Hours from `from` to `to`, rounded to two decimals and never negative.
pub fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    if to <= from {
        return 0.0;
    }
    round2((to - from).num_seconds() as f64 / 3600.0)
}

pub fn hours_to_duration(hours: f64) -> Duration {
    Duration::seconds((hours * 3600.0).round() as i64)
}

/// Regular and overtime windows scheduled for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DayWindows {
    pub regular: Option<ShiftWindow>,
    pub overtime: Option<ShiftWindow>,
}

/// [`DayWindows`] placed on a concrete date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedWindows {
    pub regular: Option<InstantRange>,
    pub overtime: Option<InstantRange>,
}

impl DayWindows {
    pub fn resolve(&self, date: NaiveDate) -> ResolvedWindows {
        let regular = self.regular.map(|w| w.on(date));
        let overtime = self.overtime.map(|ot| {
            // Overtime after a night shift belongs to the next morning.
            match self.regular {
                Some(reg) if reg.crosses_midnight() && ot.start <= reg.end => {
                    ot.on(date.succ_opt().unwrap_or(date))
                }
                _ => ot.on(date),
            }
        });
        ResolvedWindows { regular, overtime }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn duration_is_derived_across_midnight() {
        assert_eq!(ShiftWindow::from_times(t(22, 0), t(6, 0)).duration_hours, 8.0);
        assert_eq!(ShiftWindow::from_times(t(9, 0), t(17, 30)).duration_hours, 8.5);
    }

    #[test]
    fn overtime_after_night_shift_moves_to_next_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let windows = DayWindows {
            regular: Some(ShiftWindow::from_times(t(22, 0), t(6, 0))),
            overtime: Some(ShiftWindow::from_times(t(6, 0), t(8, 0))),
        };
        let resolved = windows.resolve(date);
        let ot = resolved.overtime.unwrap();
        assert_eq!(ot.start, date.succ_opt().unwrap().and_time(t(6, 0)));
        assert_eq!(resolved.regular.unwrap().end, ot.start);
    }
}
