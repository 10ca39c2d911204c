use std::sync::{Arc, Mutex, MutexGuard};

use crate::providers::{ProviderError, ScanBackend};
use crate::store::{Resolution, ResultStore, ScanToken};
use crate::types::*;
use crate::verdict::parse_response;

pub const EMPTY_TARGET_MESSAGE: &str = "Please provide a URL or page text to scan.";
pub const REPORT_THANKS: &str = "Thank you! This page has been reported.";
pub const CANCELLED_MESSAGE: &str = "Error: Scan was cancelled.";

/// Issues scans against a backend and keeps the display state per
/// `(target, purpose)`. `scan` never returns an error: every failure ends up
/// as a `Failed` state carrying a user-facing message.
pub struct ScanRequestor<B: ScanBackend> {
    backend: Arc<B>,
    // Only held for synchronous transitions, never across an await.
    store: Mutex<ResultStore>,
}

fn lock(store: &Mutex<ResultStore>) -> MutexGuard<'_, ResultStore> {
    store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Owns the token of an in-flight scan. If the scan future is dropped before
/// the backend answers, the slot is marked Failed instead of staying Pending.
struct InFlight<'a> {
    store: &'a Mutex<ResultStore>,
    token: ScanToken,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed && lock(self.store).fail(&self.token, CANCELLED_MESSAGE) == Resolution::Applied {
            tracing::debug!("Scan of {} dropped before completion", preview(&self.token.key().target));
        }
    }
}

impl<B: ScanBackend> ScanRequestor<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            store: Mutex::new(ResultStore::new()),
        }
    }

    /// Runs one scan and returns this call's own outcome. If a newer call
    /// for the same key starts meanwhile, the outcome is still returned but
    /// is not recorded in the display state.
    pub async fn scan(&self, target: &str, purpose: ScanPurpose) -> ScanRequestState {
        let token = lock(&self.store).begin(RequestKey::new(target, purpose));

        if target.trim().is_empty() {
            lock(&self.store).fail(&token, EMPTY_TARGET_MESSAGE);
            return ScanRequestState::failed(EMPTY_TARGET_MESSAGE);
        }

        tracing::info!("Scanning {} ({})", preview(target), purpose.as_str());

        let mut in_flight = InFlight {
            store: &self.store,
            token,
            armed: true,
        };
        let outcome = self.call_backend(target, purpose).await;
        in_flight.armed = false;
        let token = &in_flight.token;

        let mut store = lock(&self.store);
        let (state, resolution) = match outcome {
            Ok(result) => {
                let resolution = store.resolve_with(token, result.clone());
                (ScanRequestState::resolved(result), resolution)
            }
            Err(e) => {
                if e.is_transport() {
                    tracing::warn!("{} scan of {} failed: {}", purpose.as_str(), preview(target), e);
                } else {
                    tracing::error!("{} scan of {} got a bad reply: {}", purpose.as_str(), preview(target), e);
                }
                let message = e.user_message();
                let resolution = store.fail(token, &message);
                (ScanRequestState::failed(message), resolution)
            }
        };

        if resolution == Resolution::Stale {
            tracing::debug!("Superseded {} scan of {}", purpose.as_str(), preview(target));
        }

        state
    }

    pub async fn scan_url(&self, url: &str) -> ScanRequestState {
        self.scan(url, ScanPurpose::Url).await
    }

    pub async fn scan_content(&self, text: &str) -> ScanRequestState {
        self.scan(text, ScanPurpose::Content).await
    }

    /// Fire-and-forget report; a failure is reported once and not retried.
    pub async fn report(&self, id: &str) -> ScanRequestState {
        self.scan(id, ScanPurpose::Report).await
    }

    pub async fn current(&self, target: &str, purpose: ScanPurpose) -> ScanRequestState {
        lock(&self.store).current(&RequestKey::new(target, purpose))
    }

    /// View teardown: forgets all state and voids every outstanding request.
    pub async fn close(&self) {
        lock(&self.store).clear();
    }

    async fn call_backend(&self, target: &str, purpose: ScanPurpose) -> Result<ScanResult, ProviderError> {
        match purpose {
            ScanPurpose::Url => self.backend.analyze_url(target).await.map(|raw| parse_response(&raw)),
            ScanPurpose::Content => self
                .backend
                .analyze_content(target)
                .await
                .map(|raw| parse_response(&raw)),
            ScanPurpose::Report => self
                .backend
                .submit_report(target)
                .await
                .map(|_| ScanResult::new(Verdict::Unknown, None, REPORT_THANKS.to_string())),
        }
    }
}

// Page text can be long; only log its head.
fn preview(target: &str) -> String {
    const MAX: usize = 60;
    match target.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &target[..idx]),
        None => target.to_string(),
    }
}
