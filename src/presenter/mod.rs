// src/presenter/mod.rs

pub mod banner;
pub mod dashboard_view;

pub use banner::BannerView;
pub use dashboard_view::{DashboardView, ModelAccuracy, StatCard};
