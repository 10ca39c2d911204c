use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::snapshot::SnapshotSource;
use crate::providers::ScanBackend;
use crate::types::DashboardSummary;

/// Where the summary published by one poll attempt came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    Live,
    Snapshot,
    /// Both sources failed; the previous summary (if any) is kept.
    Retained,
}

struct PollTask {
    stop_tx: watch::Sender<bool>,
    // Detached on stop so an in-flight fetch can finish; its result is
    // dropped by the liveness check.
    _handle: JoinHandle<()>,
}

/// Refreshes the dashboard summary on a fixed schedule. Each successful
/// attempt replaces the published summary wholesale.
pub struct SummaryPoller<B: ScanBackend + 'static, S: SnapshotSource + 'static> {
    backend: Arc<B>,
    snapshot: Arc<S>,
    summary_tx: Arc<watch::Sender<Option<DashboardSummary>>>,
    task: Option<PollTask>,
}

impl<B: ScanBackend + 'static, S: SnapshotSource + 'static> SummaryPoller<B, S> {
    pub fn new(backend: Arc<B>, snapshot: Arc<S>) -> Self {
        let (summary_tx, _) = watch::channel(None);
        Self {
            backend,
            snapshot,
            summary_tx: Arc::new(summary_tx),
            task: None,
        }
    }

    /// Fetches immediately, then every `interval` measured from the start of
    /// the previous tick. Restarts the schedule if already polling.
    pub fn start(&mut self, interval: Duration) {
        self.stop();

        let interval = interval.max(Duration::from_millis(1));
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let backend = self.backend.clone();
        let snapshot = self.snapshot.clone();
        let summary_tx = self.summary_tx.clone();

        tracing::info!("Polling dashboard summary every {:?}", interval);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // An overrunning fetch skips the ticks it missed instead of
            // replaying them back to back.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick is immediate; the first fetch does not wait on it.
            ticker.tick().await;

            loop {
                let (outcome, fetched) = fetch_with_fallback(backend.as_ref(), snapshot.as_ref()).await;

                if *stop_rx.borrow() || stop_rx.has_changed().is_err() {
                    tracing::debug!("Poller stopped during fetch, discarding {:?} result", outcome);
                    break;
                }

                if let Some(summary) = fetched {
                    summary_tx.send_replace(Some(summary));
                }

                tokio::select! {
                    biased;
                    _ = stop_rx.changed() => break,
                    _ = ticker.tick() => {}
                }
            }
        });

        self.task = Some(PollTask {
            stop_tx,
            _handle: handle,
        });
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.stop_tx.send(true);
            tracing::info!("Stopped dashboard polling");
        }
    }

    pub fn is_polling(&self) -> bool {
        self.task.is_some()
    }

    /// One attempt outside the schedule, with the same fallback rules.
    pub async fn refresh_once(&self) -> PollOutcome {
        let (outcome, fetched) = fetch_with_fallback(self.backend.as_ref(), self.snapshot.as_ref()).await;
        if let Some(summary) = fetched {
            self.summary_tx.send_replace(Some(summary));
        }
        outcome
    }

    pub fn latest(&self) -> Option<DashboardSummary> {
        self.summary_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<DashboardSummary>> {
        self.summary_tx.subscribe()
    }
}

impl<B: ScanBackend + 'static, S: SnapshotSource + 'static> Drop for SummaryPoller<B, S> {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn fetch_with_fallback<B: ScanBackend, S: SnapshotSource>(
    backend: &B,
    snapshot: &S,
) -> (PollOutcome, Option<DashboardSummary>) {
    match backend.fetch_summary().await {
        Ok(summary) => (PollOutcome::Live, Some(summary)),
        Err(e) => {
            tracing::warn!("Falling back to snapshot summary: {}", e);
            match snapshot.load().await {
                Ok(summary) => (PollOutcome::Snapshot, Some(summary)),
                Err(e) => {
                    tracing::error!("Snapshot summary unavailable, keeping previous: {}", e);
                    (PollOutcome::Retained, None)
                }
            }
        }
    }
}
