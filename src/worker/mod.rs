//! Background workers.
//!
//! Each worker owns its timer and is handed the database handle and clock
//! explicitly. Both stop when the shared [`CancellationToken`] is cancelled.

pub mod absence;
pub mod reconciler;

use crate::errors::{AppError, AppResult};
use tokio_util::sync::CancellationToken;

pub use absence::AbsenceSweeper;
pub use reconciler::Reconciler;

/// Run both workers until `cancel` fires, then wait for them to finish.
pub async fn run_workers(
    reconciler: Reconciler,
    sweeper: AbsenceSweeper,
    cancel: CancellationToken,
) -> AppResult<()> {
    let reconcile_task = {
        let cancel = cancel.clone();
        tokio::spawn(async move { reconciler.run(cancel).await })
    };
    let absence_task = {
        let cancel = cancel.clone();
        tokio::spawn(async move { sweeper.run(cancel).await })
    };

    let (r1, r2) = tokio::join!(reconcile_task, absence_task);
    r1.map_err(|e| AppError::Worker(format!("reconciler: {e}")))?;
    r2.map_err(|e| AppError::Worker(format!("absence sweeper: {e}")))?;

    tracing::info!("Background workers stopped");
    Ok(())
}
