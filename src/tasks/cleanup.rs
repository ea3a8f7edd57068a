//! Completed Todo Cleanup Task
//!
//! Background task that periodically deletes todos marked as completed.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::models::{TODO_PARTITION_KEY, WILDCARD_ETAG};
use crate::storage::{StoreError, TableStore};

/// Outcome of one cleanup sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    /// Rows inspected in the partition
    pub scanned: usize,
    /// Completed rows removed
    pub deleted: usize,
    pub finished_at: DateTime<Utc>,
}

impl CleanupReport {
    /// Summary line logged after every sweep.
    pub fn summary(&self) -> String {
        format!(
            "Deleting task completed: {} of {} todos removed at {}",
            self.deleted,
            self.scanned,
            self.finished_at.to_rfc3339()
        )
    }
}

// == Run Cleanup ==
/// Deletes every completed todo in the partition, one row at a time.
///
/// Rows deleted before a failure stay deleted; the error ends the sweep and
/// the remaining rows wait for the next tick.
pub async fn run_cleanup(store: &dyn TableStore) -> Result<CleanupReport, StoreError> {
    let todos = store.query_all(TODO_PARTITION_KEY).await?;
    let scanned = todos.len();

    let mut deleted = 0;
    for todo in todos.iter().filter(|todo| todo.is_completed) {
        store
            .delete(&todo.partition_key, &todo.row_key, WILDCARD_ETAG)
            .await?;
        debug!(id = %todo.row_key, "Deleted completed todo");
        deleted += 1;
    }

    let report = CleanupReport {
        scanned,
        deleted,
        finished_at: Utc::now(),
    };
    info!("{}", report.summary());

    Ok(report)
}

/// Spawns a background task that runs [`run_cleanup`] on a fixed interval.
///
/// The first sweep happens one interval after spawning. A failed sweep is
/// logged and the timer keeps running.
///
/// # Arguments
/// * `store` - Table holding the todos
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(
    store: Arc<dyn TableStore>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let period = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting completed todo cleanup on table '{}' every {} seconds",
            store.table_name(),
            period.as_secs()
        );

        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if let Err(err) = run_cleanup(store.as_ref()).await {
                error!("Completed todo cleanup failed: {}", err);
            }
        }
    })
}
