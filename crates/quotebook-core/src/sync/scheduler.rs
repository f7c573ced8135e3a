//! Periodic sync task with a cancellable handle

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{RemoteGateway, SyncService};
use crate::models::SyncReport;

/// Handle to a running scheduler; dropping it leaves the task running.
pub struct SyncHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Stop scheduling new cycles and wait for the task to exit.
    ///
    /// A cycle already in flight runs to completion first.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(error) = self.task.await {
            tracing::warn!("Sync scheduler task ended abnormally: {error}");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

pub struct SyncScheduler;

impl SyncScheduler {
    /// Spawn a task running one sync cycle per `interval`, starting now.
    ///
    /// `on_report` is called for every cycle that changed something.
    /// Ticks missed while a cycle runs are delayed, never bunched up.
    pub fn start<G, F>(service: Arc<SyncService<G>>, interval: Duration, on_report: F) -> SyncHandle
    where
        G: RemoteGateway + 'static,
        F: Fn(SyncReport) + Send + 'static,
    {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                        continue;
                    }
                }

                if let Some(report) = service.sync_now().await {
                    if report.has_changes() {
                        on_report(report);
                    }
                }
            }

            tracing::debug!("Sync scheduler stopped");
        });

        tracing::debug!("Sync scheduled every {:?}", interval);
        SyncHandle { shutdown, task }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::db::{KeyValueStore, MemoryKeyValueStore, QUOTES_KEY};
    use crate::models::{Quote, QuoteId};
    use crate::store::QuoteStore;
    use crate::sync::testing::FakeGateway;

    fn service(gateway: FakeGateway) -> Arc<SyncService<FakeGateway>> {
        let storage = MemoryKeyValueStore::new();
        storage.set(QUOTES_KEY, "[]").unwrap();
        let store = QuoteStore::load(storage, MemoryKeyValueStore::new()).unwrap();
        Arc::new(SyncService::new(store.into_shared(), gateway))
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_runs_cycles_until_shutdown() {
        let service = service(FakeGateway::with_remote(vec![]));
        let handle = SyncScheduler::start(Arc::clone(&service), Duration::from_secs(5), |_| {});

        tokio::time::sleep(Duration::from_secs(11)).await;
        handle.shutdown().await;

        let calls = service.gateway().fetch_calls.load(Ordering::SeqCst);
        assert!(calls >= 2, "expected repeated cycles, got {calls}");

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(service.gateway().fetch_calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_reports_only_cycles_with_changes() {
        let service = service(FakeGateway::with_remote(vec![Quote::with_id(
            QuoteId::synced("1"),
            "Remote",
            "General",
        )]));
        let reports = Arc::new(AtomicUsize::new(0));

        let handle = SyncScheduler::start(Arc::clone(&service), Duration::from_secs(5), {
            let reports = Arc::clone(&reports);
            move |report| {
                assert_eq!(report.new_from_server, 1);
                reports.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_secs(16)).await;
        handle.shutdown().await;

        assert!(service.gateway().fetch_calls.load(Ordering::SeqCst) >= 3);
        assert_eq!(reports.load(Ordering::SeqCst), 1);
    }
}
