// src/host/mod.rs
//
// Active-page pipelines: query the host for the current tab, extract what
// the scan needs, then hand it to the requestor. Each stage has its own
// error and a host failure never reaches the backend.

use async_trait::async_trait;

use crate::api::ScanRequestor;
use crate::providers::ScanBackend;
use crate::types::ScanRequestState;

pub const PAGE_UNAVAILABLE_MESSAGE: &str = "Error: Cannot analyze this page.";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("no active tab")]
    NoActiveTab,
    #[error("script injection failed: {0}")]
    Injection(String),
}

/// Browser-side capabilities the pipelines depend on.
#[async_trait]
pub trait ActivePage: Send + Sync {
    async fn active_url(&self) -> Result<String, HostError>;
    async fn page_text(&self) -> Result<String, HostError>;
}

/// Fixed page, for the CLI and tests.
pub struct StaticPage {
    url: Option<String>,
    text: Result<String, HostError>,
}

impl StaticPage {
    pub fn new(url: &str, text: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            text: Ok(text.to_string()),
        }
    }

    pub fn without_tab() -> Self {
        Self {
            url: None,
            text: Err(HostError::NoActiveTab),
        }
    }

    pub fn with_text_error(mut self, error: HostError) -> Self {
        self.text = Err(error);
        self
    }
}

#[async_trait]
impl ActivePage for StaticPage {
    async fn active_url(&self) -> Result<String, HostError> {
        self.url.clone().ok_or(HostError::NoActiveTab)
    }

    async fn page_text(&self) -> Result<String, HostError> {
        self.text.clone()
    }
}

/// Page-load scan of the visible text.
pub async fn scan_active_page<P: ActivePage, B: ScanBackend>(
    page: &P,
    requestor: &ScanRequestor<B>,
) -> ScanRequestState {
    match page.page_text().await {
        Ok(text) => requestor.scan_content(&text).await,
        Err(e) => host_failure(e),
    }
}

pub async fn scan_active_url<P: ActivePage, B: ScanBackend>(
    page: &P,
    requestor: &ScanRequestor<B>,
) -> ScanRequestState {
    match page.active_url().await {
        Ok(url) => requestor.scan_url(&url).await,
        Err(e) => host_failure(e),
    }
}

pub async fn report_active_page<P: ActivePage, B: ScanBackend>(
    page: &P,
    requestor: &ScanRequestor<B>,
) -> ScanRequestState {
    match page.active_url().await {
        Ok(url) => requestor.report(&url).await,
        Err(e) => host_failure(e),
    }
}

fn host_failure(e: HostError) -> ScanRequestState {
    tracing::warn!("Host capability failed: {}", e);
    ScanRequestState::failed(PAGE_UNAVAILABLE_MESSAGE)
}
