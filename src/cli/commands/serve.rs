//! Long-running mode: both background workers until Ctrl-C.

use crate::cli::commands::open_db;
use crate::config::Config;
use crate::core::clock::{Clock, ZonedClock};
use crate::errors::AppResult;
use crate::ui::messages;
use crate::worker::{AbsenceSweeper, Reconciler, run_workers};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(cfg))
}

async fn serve(cfg: &Config) -> AppResult<()> {
    let pool = open_db(cfg)?.into_shared();
    let clock: Arc<dyn Clock> = Arc::new(ZonedClock::new(cfg.tz()?));

    let reconciler = Reconciler::new(
        pool.clone(),
        clock.clone(),
        cfg.settings(),
        Duration::from_secs(cfg.reconcile_interval_secs),
    );
    let sweeper = AbsenceSweeper::new(pool, clock, cfg.sweep_time()?);

    let cancel = CancellationToken::new();
    let signal = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Shutdown requested"),
                Err(e) => tracing::error!(error = %e, "Cannot listen for Ctrl-C, stopping"),
            }
            cancel.cancel();
        })
    };

    messages::info(format!(
        "Serving {} (timezone {}, sweep every {}s, absences at {}). Press Ctrl-C to stop.",
        cfg.database, cfg.timezone, cfg.reconcile_interval_secs, cfg.absence_sweep_time
    ));

    let result = run_workers(reconciler, sweeper, cancel).await;
    signal.abort();
    result?;

    messages::success("Workers stopped");
    Ok(())
}
