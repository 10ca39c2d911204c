// src/api/mod.rs

pub mod requestor;

pub use requestor::{ScanRequestor, CANCELLED_MESSAGE, EMPTY_TARGET_MESSAGE, REPORT_THANKS};
