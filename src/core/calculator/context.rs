//! Which window a scan starts: regular, overtime or neither.
//!
//! The classification is a heuristic. It lives here, apart from the session
//! state machine, so the policy can be swapped without touching the scan
//! processor.

use super::window::ResolvedWindows;
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScanContext {
    Regular,
    Overtime,
    Unspecified,
}

impl ScanContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanContext::Regular => "regular",
            ScanContext::Overtime => "overtime",
            ScanContext::Unspecified => "unspecified",
        }
    }

    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "regular" => Some(ScanContext::Regular),
            "overtime" => Some(ScanContext::Overtime),
            "unspecified" => Some(ScanContext::Unspecified),
            _ => None,
        }
    }

    /// Start of the window this context refers to.
    pub fn window_start(&self, windows: &ResolvedWindows) -> Option<NaiveDateTime> {
        match self {
            ScanContext::Regular => windows.regular.map(|r| r.start),
            ScanContext::Overtime => windows.overtime.map(|r| r.start),
            ScanContext::Unspecified => None,
        }
    }
}

/// First match wins:
/// 1. overtime starts more than `tie_break` before the regular start and the
///    scan happens before `regular_start - tie_break` → overtime;
/// 2. only an overtime window → overtime;
/// 3. a regular window → regular;
/// 4. otherwise unspecified.
pub fn classify_context(
    occurred_at: NaiveDateTime,
    regular_start: Option<NaiveDateTime>,
    overtime_start: Option<NaiveDateTime>,
    tie_break: Duration,
) -> ScanContext {
    match (regular_start, overtime_start) {
        (Some(reg), Some(ot)) if reg - ot > tie_break && occurred_at < reg - tie_break => {
            ScanContext::Overtime
        }
        (None, Some(_)) => ScanContext::Overtime,
        (Some(_), _) => ScanContext::Regular,
        (None, None) => ScanContext::Unspecified,
    }
}

pub fn classify_in(
    occurred_at: NaiveDateTime,
    windows: &ResolvedWindows,
    tie_break: Duration,
) -> ScanContext {
    classify_context(
        occurred_at,
        windows.regular.map(|r| r.start),
        windows.overtime.map(|r| r.start),
        tie_break,
    )
}

/// Late when the scan lands after `window_start + grace`.
pub fn is_late(
    occurred_at: NaiveDateTime,
    window_start: Option<NaiveDateTime>,
    grace: Duration,
) -> bool {
    window_start.is_some_and(|start| occurred_at > start + grace)
}
