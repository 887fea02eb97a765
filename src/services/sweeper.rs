use crate::services::storage::{Area, StorageAreas};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::watch;
use tokio::time::sleep;

/// Background task deleting stored files once they outlive `max_age`.
///
/// Runs until the shutdown channel flips; handlers are never blocked by it
/// and never informed of it. The only coupling is the shared directories,
/// so a file a client has not retrieved within `max_age` will eventually
/// disappear under them.
pub struct RetentionSweeper {
    storage: Arc<StorageAreas>,
    max_age: Duration,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl RetentionSweeper {
    pub fn new(
        storage: Arc<StorageAreas>,
        max_age: Duration,
        interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            storage,
            max_age,
            interval,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            max_age_secs = self.max_age.as_secs(),
            interval_secs = self.interval.as_secs(),
            "Retention sweeper started"
        );

        loop {
            tokio::select! {
                _ = self.shutdown.changed() => {
                    tracing::info!("Retention sweeper shutting down");
                    break;
                }
                _ = sleep(self.interval) => {
                    self.sweep_once().await;
                }
            }
        }
    }

    /// One pass over both areas. Per-file failures are logged and skipped;
    /// a sweep never fails and never touches a file younger than `max_age`.
    pub async fn sweep_once(&self) -> usize {
        let now = SystemTime::now();
        let mut removed = 0;

        for area in Area::ALL {
            let files = match self.storage.list_files(area).await {
                Ok(files) => files,
                Err(e) => {
                    tracing::warn!(area = area.dir_name(), "Sweep listing failed: {e}");
                    continue;
                }
            };

            for (name, modified) in files {
                let age = match now.duration_since(modified) {
                    Ok(age) => age,
                    // mtime in the future (clock skew); leave it alone
                    Err(_) => continue,
                };

                if age <= self.max_age {
                    continue;
                }

                match self.storage.delete(area, &name).await {
                    Ok(()) => {
                        tracing::info!(
                            area = area.dir_name(),
                            name,
                            age_secs = age.as_secs(),
                            "Removed expired file"
                        );
                        removed += 1;
                    }
                    // Races with a concurrent sweep or manual deletion are
                    // expected; nothing here may take the loop down.
                    Err(e) => {
                        tracing::warn!(area = area.dir_name(), name, "Sweep deletion failed: {e}");
                    }
                }
            }
        }

        removed
    }
}
