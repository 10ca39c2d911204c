// src/verdict/mod.rs

pub mod mapper;

pub use mapper::{map_verdict, parse_response, VerdictDisplay, DEFAULT_ICON};
