//! Time utilities: parsing HH:MM[:SS], instant parsing, hour rounding.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveDateTime, NaiveTime};

/// Storage format for instants (wall-clock in the configured zone).
pub const INSTANT_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Storage format for shift boundaries.
pub const TIME_FMT: &str = "%H:%M:%S";

/// Parse `HH:MM:SS`, falling back to `HH:MM`.
pub fn parse_time(t: &str) -> Option<NaiveTime> {
    let t = t.trim();
    NaiveTime::parse_from_str(t, TIME_FMT)
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
        .ok()
}

pub fn parse_required_time(t: &str) -> AppResult<NaiveTime> {
    parse_time(t).ok_or_else(|| AppError::InvalidTime(t.to_string()))
}

/// Parse `YYYY-MM-DD HH:MM[:SS]` (a `T` separator is accepted too).
pub fn parse_instant(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().replacen('T', " ", 1);
    NaiveDateTime::parse_from_str(&s, INSTANT_FMT)
        .or_else(|_| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M"))
        .ok()
}

pub fn format_instant(dt: &NaiveDateTime) -> String {
    dt.format(INSTANT_FMT).to_string()
}

pub fn format_time(t: &NaiveTime) -> String {
    t.format(TIME_FMT).to_string()
}

/// Round to two decimals, the precision hours are stored with.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn format_hours(hours: f64) -> String {
    let mins = (hours * 60.0).round() as i64;
    let sign = if mins < 0 { "-" } else { "" };
    let m = mins.abs();
    format!("{}{:02}h {:02}m", sign, m / 60, m % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_time_layouts() {
        assert_eq!(parse_time("09:05"), NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(parse_time("23:59:30"), NaiveTime::from_hms_opt(23, 59, 30));
        assert_eq!(parse_time("25:00"), None);
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round2(10.083333), 10.08);
        assert_eq!(format_hours(10.08), "10h 05m");
    }
}
