// src/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Safe,
    Caution,
    Danger,
    Unknown,
}

/// Which endpoint a scan goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanPurpose {
    Url,
    Content,
    Report,
}

impl ScanPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanPurpose::Url => "url",
            ScanPurpose::Content => "content",
            ScanPurpose::Report => "report",
        }
    }
}

/// Identifies one slot of display state: the same target scanned for two
/// different purposes gets two independent slots.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub target: String,
    pub purpose: ScanPurpose,
}

impl RequestKey {
    pub fn new(target: &str, purpose: ScanPurpose) -> Self {
        Self {
            target: target.to_string(),
            purpose,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScanResult {
    verdict: Verdict,
    confidence: Option<f64>,
    reason_text: String,
    timestamp: DateTime<Utc>,
}

impl ScanResult {
    pub fn new(verdict: Verdict, confidence: Option<f64>, reason_text: String) -> Self {
        Self {
            verdict,
            confidence: confidence.filter(|c| c.is_finite() && (0.0..=1.0).contains(c)),
            reason_text,
            timestamp: Utc::now(),
        }
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    pub fn reason_text(&self) -> &str {
        &self.reason_text
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ScanStatus {
    Idle,
    Pending,
    Resolved,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScanRequestState {
    pub status: ScanStatus,
    pub result: Option<ScanResult>,
    pub error: Option<String>,
}

impl ScanRequestState {
    pub fn idle() -> Self {
        Self {
            status: ScanStatus::Idle,
            result: None,
            error: None,
        }
    }

    pub fn pending() -> Self {
        Self {
            status: ScanStatus::Pending,
            result: None,
            error: None,
        }
    }

    pub fn resolved(result: ScanResult) -> Self {
        Self {
            status: ScanStatus::Resolved,
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: ScanStatus::Failed,
            result: None,
            error: Some(message.into()),
        }
    }
}

impl Default for ScanRequestState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Scan reply as sent by the backend. Two dialects exist in the wild:
/// `{risk_level, reason_text}` and `{verdict, confidence, explanation}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawScanResponse {
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub reason_text: Option<String>,
    #[serde(default)]
    pub verdict: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl RawScanResponse {
    pub fn risk_label(&self) -> Option<&str> {
        self.risk_level.as_deref().or(self.verdict.as_deref())
    }

    pub fn reason(&self) -> &str {
        self.reason_text
            .as_deref()
            .or(self.explanation.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub threats: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub id: String,
    #[serde(default)]
    pub verdict: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_scans: u64,
    #[serde(default)]
    pub threats_today: u64,
    #[serde(default)]
    pub accuracy_by_model: BTreeMap<String, f64>,
    #[serde(default)]
    pub trend_7d: Vec<TrendPoint>,
    #[serde(default)]
    pub recent_threat_domains: Vec<String>,
    #[serde(default)]
    pub recent_reports: Vec<ReportSummary>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportDetail {
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub features: serde_json::Value,
    #[serde(default)]
    pub explanation: serde_json::Value,
}
