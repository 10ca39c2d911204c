// src/lib.rs

pub mod types;
pub mod config;
pub mod verdict;
pub mod providers;
pub mod store;
pub mod api;
pub mod dashboard;
pub mod presenter;
pub mod host;

// Re-export commonly used types
pub use types::*;
pub use config::Settings;
pub use providers::{ScanBackend, ProviderError, HttpBackend};
pub use verdict::{map_verdict, VerdictDisplay};
pub use store::{ResultStore, ScanToken, Resolution};
pub use api::ScanRequestor;
pub use dashboard::{SummaryPoller, FileSnapshot, PollOutcome, ReportFilter};
pub use presenter::{BannerView, DashboardView};
