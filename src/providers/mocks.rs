use async_trait::async_trait;
use crate::types::*;
use super::{ScanBackend, ProviderError};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

type Scripted<T> = (Duration, Result<T, ProviderError>);

/// In-memory backend. Scan replies are queued per target and handed out in
/// call order, each optionally delayed so tests can force completion order.
pub struct MockBackend {
    pub name: String,
    scans: Mutex<HashMap<String, VecDeque<Scripted<RawScanResponse>>>>,
    summaries: Mutex<VecDeque<Scripted<DashboardSummary>>>,
    reports: HashMap<String, ReportDetail>,
    report_error: Option<ProviderError>,
    scan_calls: AtomicUsize,
    summary_calls: AtomicUsize,
    report_calls: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockBackend {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            scans: Mutex::new(HashMap::new()),
            summaries: Mutex::new(VecDeque::new()),
            reports: HashMap::new(),
            report_error: None,
            scan_calls: AtomicUsize::new(0),
            summary_calls: AtomicUsize::new(0),
            report_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_response(self, target: &str, response: RawScanResponse) -> Self {
        self.with_delayed(target, Duration::ZERO, Ok(response))
    }

    pub fn with_error(self, target: &str, error: ProviderError) -> Self {
        self.with_delayed(target, Duration::ZERO, Err(error))
    }

    pub fn with_delayed(
        self,
        target: &str,
        delay: Duration,
        reply: Result<RawScanResponse, ProviderError>,
    ) -> Self {
        lock(&self.scans)
            .entry(target.to_string())
            .or_default()
            .push_back((delay, reply));
        self
    }

    pub fn with_summary(self, reply: Result<DashboardSummary, ProviderError>) -> Self {
        self.with_delayed_summary(Duration::ZERO, reply)
    }

    pub fn with_delayed_summary(
        self,
        delay: Duration,
        reply: Result<DashboardSummary, ProviderError>,
    ) -> Self {
        lock(&self.summaries).push_back((delay, reply));
        self
    }

    pub fn with_report(mut self, id: &str, detail: ReportDetail) -> Self {
        self.reports.insert(id.to_string(), detail);
        self
    }

    pub fn with_report_error(mut self, error: ProviderError) -> Self {
        self.report_error = Some(error);
        self
    }

    pub fn scan_calls(&self) -> usize {
        self.scan_calls.load(Ordering::SeqCst)
    }

    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }

    pub fn report_calls(&self) -> usize {
        self.report_calls.load(Ordering::SeqCst)
    }

    async fn next_scan(&self, target: &str) -> Result<RawScanResponse, ProviderError> {
        self.scan_calls.fetch_add(1, Ordering::SeqCst);

        // The last scripted reply for a target is sticky.
        let scripted = {
            let mut scans = lock(&self.scans);
            match scans.get_mut(target) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match scripted {
            Some((delay, reply)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                reply
            }
            None => Err(ProviderError::NotFound),
        }
    }
}

#[async_trait]
impl ScanBackend for MockBackend {
    fn backend_name(&self) -> &str {
        &self.name
    }

    async fn analyze_url(&self, url: &str) -> Result<RawScanResponse, ProviderError> {
        self.next_scan(url).await
    }

    async fn analyze_content(&self, text: &str) -> Result<RawScanResponse, ProviderError> {
        self.next_scan(text).await
    }

    async fn submit_report(&self, id: &str) -> Result<(), ProviderError> {
        self.report_calls.fetch_add(1, Ordering::SeqCst);
        self.next_scan(id).await.map(|_| ())
    }

    async fn fetch_summary(&self) -> Result<DashboardSummary, ProviderError> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);

        let scripted = {
            let mut summaries = lock(&self.summaries);
            if summaries.len() > 1 {
                summaries.pop_front()
            } else {
                summaries.front().cloned()
            }
        };

        match scripted {
            Some((delay, reply)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                reply
            }
            None => Err(ProviderError::Network("no summary scripted".to_string())),
        }
    }

    async fn fetch_report(&self, id: &str) -> Result<ReportDetail, ProviderError> {
        if let Some(err) = &self.report_error {
            return Err(err.clone());
        }

        self.reports.get(id).cloned().ok_or(ProviderError::NotFound)
    }
}
