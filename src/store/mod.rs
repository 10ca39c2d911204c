// src/store/mod.rs

pub mod result_store;

pub use result_store::{Resolution, ResultStore, ScanToken};
