use async_trait::async_trait;
use std::path::PathBuf;

use crate::providers::ProviderError;
use crate::types::DashboardSummary;

/// Local copy of the dashboard summary used when the live endpoint is down.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn load(&self) -> Result<DashboardSummary, ProviderError>;
}

/// Reads the snapshot from a JSON file with the same schema as the live
/// endpoint. The file is re-read on every fallback.
pub struct FileSnapshot {
    path: PathBuf,
}

impl FileSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshot {
    async fn load(&self) -> Result<DashboardSummary, ProviderError> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProviderError::NotFound
            } else {
                ProviderError::Io(e.to_string())
            }
        })?;

        serde_json::from_str(&text).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

/// Fixed in-memory snapshot.
pub struct StaticSnapshot(pub DashboardSummary);

#[async_trait]
impl SnapshotSource for StaticSnapshot {
    async fn load(&self) -> Result<DashboardSummary, ProviderError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("shield-scan-{}-{}", std::process::id(), name))
    }

    #[tokio::test]
    async fn test_file_snapshot_loads() {
        let path = temp_path("summary.json");
        tokio::fs::write(
            &path,
            r#"{"total_scans": 1520, "threats_today": 7, "accuracy_by_model": {"url_model": 0.97},
               "trend_7d": [{"date": "2026-10-10", "threats": 4}]}"#,
        )
        .await
        .unwrap();

        let summary = FileSnapshot::new(&path).load().await.unwrap();
        assert_eq!(summary.total_scans, 1520);
        assert_eq!(summary.accuracy_by_model.get("url_model"), Some(&0.97));
        assert_eq!(summary.trend_7d.len(), 1);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let result = FileSnapshot::new(temp_path("does-not-exist.json")).load().await;
        assert_eq!(result, Err(ProviderError::NotFound));
    }

    #[tokio::test]
    async fn test_malformed_file_is_invalid_response() {
        let path = temp_path("broken.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let result = FileSnapshot::new(&path).load().await;
        assert!(matches!(result, Err(ProviderError::InvalidResponse(_))));

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
