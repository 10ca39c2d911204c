use serde::Serialize;

use crate::dashboard::ReportFilter;
use crate::types::{DashboardSummary, ReportSummary, TrendPoint};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub accent: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModelAccuracy {
    pub model: &'static str,
    pub precision: f64,
    pub recall: f64,
}

// (label, summary key, default precision, recall). Recall is not reported
// by the backend.
const MODELS: [(&str, &str, f64, f64); 4] = [
    ("URL", "url_model", 0.98, 0.94),
    ("Image", "image_model", 0.94, 0.90),
    ("Video", "video_model", 0.93, 0.88),
    ("Audio", "audio_model", 0.95, 0.92),
];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardView {
    pub stats: Vec<StatCard>,
    pub trend: Vec<TrendPoint>,
    pub top_domains: Vec<String>,
    pub accuracy: Vec<ModelAccuracy>,
    pub reports: Vec<ReportSummary>,
}

impl DashboardView {
    /// Before the first summary arrives there are no stat cards, but the
    /// accuracy chart still renders with default figures.
    pub fn project(summary: Option<&DashboardSummary>, filter: &ReportFilter) -> Self {
        let accuracy: Vec<ModelAccuracy> = MODELS
            .iter()
            .map(|(label, key, default_precision, recall)| ModelAccuracy {
                model: *label,
                precision: summary
                    .and_then(|s| s.accuracy_by_model.get(*key).copied())
                    .unwrap_or(*default_precision),
                recall: *recall,
            })
            .collect();

        let summary = match summary {
            Some(summary) => summary,
            None => {
                return DashboardView {
                    stats: Vec::new(),
                    trend: Vec::new(),
                    top_domains: Vec::new(),
                    accuracy,
                    reports: Vec::new(),
                }
            }
        };

        let url_accuracy = summary.accuracy_by_model.get("url_model").copied().unwrap_or(0.0);

        DashboardView {
            stats: vec![
                StatCard {
                    title: "Total Scans".to_string(),
                    value: summary.total_scans.to_string(),
                    accent: "blue",
                },
                StatCard {
                    title: "Threats Today".to_string(),
                    value: summary.threats_today.to_string(),
                    accent: "red",
                },
                StatCard {
                    title: "Accuracy (URL)".to_string(),
                    value: format!("{}%", (url_accuracy * 100.0).round()),
                    accent: "green",
                },
            ],
            trend: summary.trend_7d.clone(),
            top_domains: summary.recent_threat_domains.clone(),
            accuracy,
            reports: filter.apply(&summary.recent_reports).into_iter().cloned().collect(),
        }
    }
}
