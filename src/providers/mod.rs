// src/providers/mod.rs

use async_trait::async_trait;
use crate::types::*;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("not found")]
    NotFound,
    #[error("io error: {0}")]
    Io(String),
}

impl ProviderError {
    /// Text shown in the result banner.
    pub fn user_message(&self) -> String {
        match self {
            ProviderError::Timeout | ProviderError::Network(_) => {
                "Error: Could not connect to server.".to_string()
            }
            ProviderError::Status(code) => format!("Error: Server returned HTTP {}.", code),
            ProviderError::InvalidResponse(_) => {
                "Error: Unexpected response from server.".to_string()
            }
            ProviderError::NotFound => "Error: Not found.".to_string(),
            ProviderError::Io(_) => "Error: Could not read local data.".to_string(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ProviderError::Timeout | ProviderError::Network(_) | ProviderError::Status(_)
        )
    }
}

/// The remote scanning service as seen by the client.
#[async_trait]
pub trait ScanBackend: Send + Sync {
    fn backend_name(&self) -> &str;

    async fn analyze_url(&self, url: &str) -> Result<RawScanResponse, ProviderError>;
    async fn analyze_content(&self, text: &str) -> Result<RawScanResponse, ProviderError>;
    async fn submit_report(&self, id: &str) -> Result<(), ProviderError>;
    async fn fetch_summary(&self) -> Result<DashboardSummary, ProviderError>;
    async fn fetch_report(&self, id: &str) -> Result<ReportDetail, ProviderError>;
}

// Module declarations
pub mod mocks;
pub mod http;

pub use mocks::MockBackend;
pub use http::HttpBackend;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert!(ProviderError::Timeout.is_transport());
        assert!(ProviderError::Status(502).is_transport());
        assert!(!ProviderError::InvalidResponse("eof".to_string()).is_transport());
    }

    #[test]
    fn test_user_messages_not_empty() {
        let errors = vec![
            ProviderError::Timeout,
            ProviderError::Network("refused".to_string()),
            ProviderError::Status(500),
            ProviderError::InvalidResponse("eof".to_string()),
            ProviderError::NotFound,
            ProviderError::Io("denied".to_string()),
        ];
        for e in errors {
            assert!(!e.user_message().is_empty());
        }
        assert_eq!(ProviderError::Status(500).user_message(), "Error: Server returned HTTP 500.");
    }
}
