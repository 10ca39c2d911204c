use serde::Serialize;

use crate::types::{ScanRequestState, ScanStatus};
use crate::verdict::{VerdictDisplay, DEFAULT_ICON};

/// Everything the popup needs to draw one result banner. Derived from a
/// `ScanRequestState` and nothing else.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BannerView {
    pub visible: bool,
    pub loading: bool,
    pub banner_class: String,
    pub icon: String,
    pub title: String,
    pub details: String,
}

impl BannerView {
    pub fn from_state(state: &ScanRequestState) -> Self {
        match state.status {
            ScanStatus::Idle => BannerView {
                visible: false,
                loading: false,
                banner_class: "banner".to_string(),
                icon: DEFAULT_ICON.to_string(),
                title: String::new(),
                details: String::new(),
            },
            ScanStatus::Pending => BannerView {
                visible: true,
                loading: true,
                banner_class: "banner banner-gray".to_string(),
                icon: DEFAULT_ICON.to_string(),
                title: "Info".to_string(),
                details: "Scanning...".to_string(),
            },
            ScanStatus::Failed => BannerView {
                visible: true,
                loading: false,
                banner_class: "banner banner-gray".to_string(),
                icon: DEFAULT_ICON.to_string(),
                title: "Error".to_string(),
                details: state
                    .error
                    .clone()
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "An unknown error occurred".to_string()),
            },
            ScanStatus::Resolved => match &state.result {
                Some(result) => {
                    let display = VerdictDisplay::for_verdict(result.verdict());
                    let details = match result.confidence() {
                        Some(confidence) if result.reason_text().is_empty() => {
                            format!("Confidence: {:.1}%", confidence * 100.0)
                        }
                        Some(confidence) => format!(
                            "Confidence: {:.1}%\n{}",
                            confidence * 100.0,
                            result.reason_text()
                        ),
                        None => result.reason_text().to_string(),
                    };

                    BannerView {
                        visible: true,
                        loading: false,
                        banner_class: format!("banner {}", display.banner_class),
                        icon: display.icon.to_string(),
                        title: display.title.to_string(),
                        details,
                    }
                }
                None => BannerView::from_state(&ScanRequestState::failed("")),
            },
        }
    }
}
