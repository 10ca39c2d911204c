// src/dashboard/mod.rs

pub mod snapshot;
pub mod poller;
pub mod reports;

pub use snapshot::{FileSnapshot, SnapshotSource, StaticSnapshot};
pub use poller::{PollOutcome, SummaryPoller};
pub use reports::{open_report, ReportFilter, RECENT_REPORT_LIMIT};
