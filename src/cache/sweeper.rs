//! Periodic purge of expired cache entries
//!
//! The sweep runs as its own tokio task and lives exactly as long as the
//! [`Sweeper`] handle that spawned it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::TtlCache;

/// Handle for the background sweep task
#[derive(Debug)]
pub struct Sweeper {
    /// Closing or sending on this stops the task
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl Sweeper {
    /// Spawns a task that purges expired entries from `cache` every `period`
    ///
    /// The first purge happens one full `period` after spawning.
    pub fn spawn<V>(cache: Arc<TtlCache<V>>, period: Duration) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // Skip the first tick (immediate)
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let removed = cache.purge_expired();
                        if removed > 0 {
                            debug!(removed, remaining = cache.len(), "swept expired cache entries");
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }

            debug!("cache sweeper stopped");
        });

        Self { shutdown_tx, task }
    }

    /// Stops the sweep task and waits for it to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.task.await {
            warn!("cache sweeper task ended abnormally: {}", e);
        }
    }
}
