use async_trait::async_trait;
use crate::config::Settings;
use crate::types::*;
use super::{ScanBackend, ProviderError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

pub struct HttpBackend {
    client: reqwest::Client,
    api_url: String,
    dashboard_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(api_url: &str, dashboard_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            dashboard_url: dashboard_url.trim_end_matches('/').to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut backend = Self::new(&settings.api_endpoint, &settings.dashboard_endpoint);
        backend.api_key = settings.api_key.clone().filter(|key| !key.is_empty());
        backend.timeout = Duration::from_secs(settings.request_timeout_secs);
        backend
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Response, ProviderError> {
        let mut request = self.client.post(url).json(body).timeout(self.timeout);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(transport_error)?;
        check_status(url, response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let mut request = self.client.get(url).timeout(self.timeout);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(transport_error)?;
        let response = check_status(url, response).await?;
        parse_body(response).await
    }

    async fn analyze(&self, path: &str, body: serde_json::Value) -> Result<RawScanResponse, ProviderError> {
        let url = format!("{}{}", self.api_url, path);
        tracing::debug!("POST {}", url);
        let response = self.post_json(&url, &body).await?;
        parse_body(response).await
    }

    fn report_url(&self, id: &str) -> Result<String, ProviderError> {
        let mut url = reqwest::Url::parse(&self.dashboard_url)
            .map_err(|e| ProviderError::Network(format!("bad dashboard endpoint: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Network("dashboard endpoint cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(&["reports", id]);
        Ok(url.to_string())
    }
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Network(e.to_string())
    }
}

async fn check_status(url: &str, response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == reqwest::StatusCode::NOT_FOUND {
        tracing::warn!("{} returned 404", url);
        return Err(ProviderError::NotFound);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!("{} returned {}: {}", url, status, body);
    Err(ProviderError::Status(status.as_u16()))
}

async fn parse_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ProviderError> {
    let text = response.text().await.map_err(transport_error)?;

    serde_json::from_str(&text).map_err(|e| {
        tracing::warn!("JSON parse error: {}", e);
        ProviderError::InvalidResponse(e.to_string())
    })
}

#[async_trait]
impl ScanBackend for HttpBackend {
    fn backend_name(&self) -> &str {
        "http"
    }

    async fn analyze_url(&self, url: &str) -> Result<RawScanResponse, ProviderError> {
        self.analyze("/v1/analyze-url", json!({ "url": url })).await
    }

    async fn analyze_content(&self, text: &str) -> Result<RawScanResponse, ProviderError> {
        self.analyze("/v1/analyze", json!({ "email_text": text })).await
    }

    async fn submit_report(&self, id: &str) -> Result<(), ProviderError> {
        let url = format!("{}/v1/report", self.api_url);
        self.post_json(&url, &json!({ "email_id": id })).await?;
        tracing::info!("Reported {}", id);
        Ok(())
    }

    async fn fetch_summary(&self) -> Result<DashboardSummary, ProviderError> {
        let url = format!("{}/dashboard/summary", self.dashboard_url);
        self.get_json(&url).await
    }

    async fn fetch_report(&self, id: &str) -> Result<ReportDetail, ProviderError> {
        let url = self.report_url(id)?;
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let backend = HttpBackend::new("http://localhost:5000/api/", "http://localhost:8001/api/");
        assert_eq!(backend.api_url, "http://localhost:5000/api");
        assert_eq!(backend.dashboard_url, "http://localhost:8001/api");
    }

    #[test]
    fn test_report_id_is_encoded() {
        let backend = HttpBackend::new("http://localhost:5000/api", "http://localhost:8001/api");
        let url = backend.report_url("a b/c").unwrap();
        assert_eq!(url, "http://localhost:8001/api/reports/a%20b%2Fc");
    }

    #[test]
    fn test_from_settings_ignores_empty_key() {
        let settings = Settings {
            api_key: Some(String::new()),
            ..Settings::default()
        };
        let backend = HttpBackend::from_settings(&settings);
        assert!(backend.api_key.is_none());
    }
}
