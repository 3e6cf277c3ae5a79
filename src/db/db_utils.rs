//! Column conversion helpers shared by the row mappers.

use crate::errors::AppError;
use crate::utils::date::{DATE_FMT, format_date};
use crate::utils::time::{INSTANT_FMT, format_instant, parse_time};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::Row;
use rusqlite::types::Type;

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub fn date_col(row: &Row, name: &str) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(name)?;
    NaiveDate::parse_from_str(&raw, DATE_FMT)
        .map_err(|_| conversion_error(0, AppError::InvalidDate(raw)))
}

pub fn time_col(row: &Row, name: &str) -> rusqlite::Result<NaiveTime> {
    let raw: String = row.get(name)?;
    parse_time(&raw).ok_or_else(|| conversion_error(0, AppError::InvalidTime(raw)))
}

pub fn instant_col(row: &Row, name: &str) -> rusqlite::Result<Option<NaiveDateTime>> {
    let raw: Option<String> = row.get(name)?;
    raw.map(|s| {
        NaiveDateTime::parse_from_str(&s, INSTANT_FMT)
            .map_err(|_| conversion_error(0, AppError::InvalidTime(s)))
    })
    .transpose()
}

/// Parse an enum column through its `from_db_str`.
pub fn enum_col<T>(row: &Row, name: &str, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let raw: String = row.get(name)?;
    parse(&raw)
        .ok_or_else(|| conversion_error(0, AppError::Other(format!("invalid {name}: {raw}"))))
}

pub fn date_param(d: &NaiveDate) -> String {
    format_date(d)
}

pub fn instant_param(dt: &Option<NaiveDateTime>) -> Option<String> {
    dt.as_ref().map(format_instant)
}
