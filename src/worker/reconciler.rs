//! Periodic reconciliation of open sessions.

use crate::config::Settings;
use crate::core::clock::Clock;
use crate::core::reconcile::{SweepReport, reconcile_open_sessions};
use crate::db::pool::SharedPool;
use crate::errors::AppResult;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Resets the in-flight flag when a sweep ends, however it ends.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct Reconciler {
    pool: SharedPool,
    clock: Arc<dyn Clock>,
    settings: Settings,
    interval: Duration,
    in_flight: Arc<AtomicBool>,
}

impl Reconciler {
    pub fn new(
        pool: SharedPool,
        clock: Arc<dyn Clock>,
        settings: Settings,
        interval: Duration,
    ) -> Self {
        Self {
            pool,
            clock,
            settings,
            interval,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Sweep on every interval tick until `cancel` is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Reconciler started"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Reconciler stopping");
                    break;
                }
                _ = interval.tick() => {
                    match self.tick().await {
                        Ok(Some(_)) => {}
                        Ok(None) => tracing::debug!("Previous sweep still running, tick skipped"),
                        Err(e) => tracing::error!(error = %e, "Reconciliation sweep failed"),
                    }
                }
            }
        }
    }

    /// Run one sweep now. Returns `None` without sweeping when another
    /// sweep is still in flight.
    pub async fn tick(&self) -> AppResult<Option<SweepReport>> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Ok(None);
        }
        let _guard = InFlight(self.in_flight.clone());

        let now = self.clock.now();
        let settings = self.settings;
        let report = self
            .pool
            .run(move |conn| reconcile_open_sessions(conn, &settings, now))
            .await?;
        Ok(Some(report))
    }
}
