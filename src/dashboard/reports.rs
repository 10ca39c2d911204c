use serde_json::json;

use crate::providers::ScanBackend;
use crate::types::{ReportDetail, ReportSummary};

/// The dashboard table shows at most this many recent reports.
pub const RECENT_REPORT_LIMIT: usize = 10;

/// Content-type selector plus free-text search over the report table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportFilter {
    /// `None` means all types.
    pub content_type: Option<String>,
    pub query: String,
}

impl ReportFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Parses the selector value used by the dashboard (`"all"`, `"url"`,
    /// `"image"`, ...).
    pub fn with_type(mut self, selector: &str) -> Self {
        self.content_type = match selector {
            "" | "all" => None,
            other => Some(other.to_string()),
        };
        self
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.to_string();
        self
    }

    pub fn matches(&self, report: &ReportSummary) -> bool {
        let type_matches = match &self.content_type {
            None => true,
            Some(wanted) => report.content_type.as_deref() == Some(wanted.as_str()),
        };

        let query_matches = self.query.is_empty()
            || report.id.contains(&self.query)
            || report.domain.as_deref().unwrap_or_default().contains(&self.query)
            || report.source.as_deref().unwrap_or_default().contains(&self.query);

        type_matches && query_matches
    }

    /// Applies the filter to the most recent reports only.
    pub fn apply<'a>(&self, reports: &'a [ReportSummary]) -> Vec<&'a ReportSummary> {
        reports
            .iter()
            .take(RECENT_REPORT_LIMIT)
            .filter(|r| self.matches(r))
            .collect()
    }
}

/// Loads the full report behind a table row. When the detail endpoint is
/// unavailable a shallow detail built from the row is returned instead.
pub async fn open_report<B: ScanBackend>(backend: &B, report: &ReportSummary) -> ReportDetail {
    match backend.fetch_report(&report.id).await {
        Ok(detail) => detail,
        Err(e) => {
            tracing::warn!("Falling back to shallow report {}: {}", report.id, e);
            ReportDetail {
                metadata: json!({
                    "id": report.id,
                    "source": report.content_type,
                }),
                features: json!({}),
                explanation: json!({}),
            }
        }
    }
}
