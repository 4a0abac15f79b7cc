use crate::service::CollectorService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Periodic collector, not yet started
pub struct Scheduler {
    service: Arc<CollectorService>,
    interval: Duration,
}

/// A running collector loop
pub struct SchedulerHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Scheduler {
    pub fn new(service: Arc<CollectorService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Start collecting in the background: one cycle right away, then one per interval.
    ///
    /// Dropping the returned handle also stops the loop at its next wait.
    pub fn spawn(self) -> SchedulerHandle {
        let (stop, stop_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(stop_rx));
        SchedulerHandle { stop, task }
    }

    async fn run(self, mut stop: watch::Receiver<bool>) {
        info!("Collector started, interval {:?}", self.interval);

        loop {
            self.run_cycle().await;

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Collector stopped");
    }

    /// One fetch-normalize-save pass. Never fails: errors and panics are logged and dropped.
    async fn run_cycle(&self) {
        let service = self.service.clone();
        let outcome = tokio::spawn(async move { service.collect_once().await }).await;

        match outcome {
            Ok(Ok(record)) => {
                info!(
                    "Collected {}={} {} (id {})",
                    record.asset, record.value, record.quote_currency, record.id
                );
            }
            Ok(Err(e)) => {
                error!("Collection cycle failed ({:?}): {}", e.kind(), e);
            }
            Err(e) => {
                error!("Collection cycle aborted: {}", e);
            }
        }
    }
}

impl SchedulerHandle {
    /// Signal the loop to stop and wait for the in-flight cycle, if any, to finish.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.task.await {
            warn!("Collector task ended abnormally: {}", e);
        }
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
