//! Once-a-day absence sweep.

use crate::core::absence::{AbsenceReport, mark_absences};
use crate::core::clock::Clock;
use crate::db::pool::SharedPool;
use crate::errors::AppResult;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Next occurrence of `at` strictly after `now`: the day it falls on and how
/// long to sleep until then.
pub fn next_run(now: NaiveDateTime, at: NaiveTime) -> (NaiveDate, std::time::Duration) {
    let today_at = now.date().and_time(at);
    let target = if now < today_at {
        today_at
    } else {
        today_at + Duration::days(1)
    };
    let wait = (target - now).to_std().unwrap_or_default();
    (target.date(), wait)
}

pub struct AbsenceSweeper {
    pool: SharedPool,
    clock: Arc<dyn Clock>,
    run_at: NaiveTime,
}

impl AbsenceSweeper {
    pub fn new(pool: SharedPool, clock: Arc<dyn Clock>, run_at: NaiveTime) -> Self {
        Self {
            pool,
            clock,
            run_at,
        }
    }

    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(run_at = %self.run_at, "Absence sweeper started");

        loop {
            let (date, wait) = next_run(self.clock.now(), self.run_at);
            tracing::debug!(
                date = %date,
                wait_secs = wait.as_secs(),
                "Next absence sweep scheduled"
            );

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Absence sweeper stopping");
                    break;
                }
                _ = tokio::time::sleep(wait) => {
                    if let Err(e) = self.sweep(date).await {
                        tracing::error!(date = %date, error = %e, "Absence sweep failed");
                    }
                }
            }
        }
    }

    /// Mark absences for `date` right away.
    pub async fn sweep(&self, date: NaiveDate) -> AppResult<AbsenceReport> {
        let now = self.clock.now();
        self.pool
            .run(move |conn| mark_absences(conn, date, now))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::next_run;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn next_run_rolls_over_after_todays_slot() {
        let at = NaiveTime::from_hms_opt(23, 55, 0).unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();

        let (date, wait) = next_run(day.and_hms_opt(23, 0, 0).unwrap(), at);
        assert_eq!(date, day);
        assert_eq!(wait.as_secs(), 55 * 60);

        let (date, wait) = next_run(day.and_hms_opt(23, 56, 0).unwrap(), at);
        assert_eq!(date, day.succ_opt().unwrap());
        assert_eq!(wait.as_secs(), 24 * 3600 - 60);
    }
}
