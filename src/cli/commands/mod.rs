pub mod config;
pub mod directory;
pub mod init;
pub mod list;
pub mod log;
pub mod scan;
pub mod schedule;
pub mod serve;
pub mod sweep;

use crate::cli::parser::SlotArgs;
use crate::config::Config;
use crate::core::clock::{Clock, ZonedClock};
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::schedule_entry::Slot;
use crate::utils::{date, time};
use chrono::{NaiveDate, NaiveDateTime};

/// Open the configured database, applying pending migrations.
pub(crate) fn open_db(cfg: &Config) -> AppResult<DbPool> {
    let mut pool = DbPool::new(&cfg.database)?;
    init_db(&mut pool.conn)?;
    Ok(pool)
}

pub(crate) fn clock(cfg: &Config) -> AppResult<ZonedClock> {
    Ok(ZonedClock::new(cfg.tz()?))
}

/// `YYYY-MM-DD`, or today in the configured zone.
pub(crate) fn date_or_today(arg: Option<&str>, cfg: &Config) -> AppResult<NaiveDate> {
    match arg {
        Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string())),
        None => Ok(clock(cfg)?.today()),
    }
}

pub(crate) fn required_date(s: &str) -> AppResult<NaiveDate> {
    date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

/// `YYYY-MM-DD HH:MM[:SS]`, or now in the configured zone.
pub(crate) fn instant_or_now(arg: Option<&str>, cfg: &Config) -> AppResult<NaiveDateTime> {
    match arg {
        Some(s) => time::parse_instant(s).ok_or_else(|| AppError::InvalidTime(s.to_string())),
        None => Ok(clock(cfg)?.now()),
    }
}

pub(crate) fn slot_of(args: &SlotArgs) -> AppResult<Slot> {
    match (args.employee, args.joker) {
        (Some(id), None) => Ok(Slot::Employee(id)),
        (None, Some(n)) => Ok(Slot::Joker(n)),
        _ => Err(AppError::Validation(
            "exactly one of --employee or --joker is required".into(),
        )),
    }
}
