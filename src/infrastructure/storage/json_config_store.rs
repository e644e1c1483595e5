use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::errors::{TuningError, TuningResult};
use crate::domain::models::BalanceConfig;
use crate::domain::ports::ConfigStore;

/// File name the game reads its balance parameters from.
pub const CONFIG_FILE_NAME: &str = "balance_config.json";

/// Balance configuration stored as a flat JSON object on disk.
///
/// Written with sorted keys and two-space indentation so diffs between
/// iterations stay readable.
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<project>/balance_config.json`.
    pub fn in_project(project_path: impl AsRef<Path>) -> Self {
        Self::new(project_path.as_ref().join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConfigStore for JsonConfigStore {
    async fn read(&self) -> TuningResult<BalanceConfig> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no persisted config, using defaults");
                return Ok(BalanceConfig::defaults());
            }
            Err(err) => {
                return Err(TuningError::Storage(format!(
                    "failed to read {}: {err}",
                    self.path.display()
                )))
            }
        };

        serde_json::from_str(&contents).map_err(|err| {
            TuningError::Storage(format!(
                "{} is not a flat JSON object of numbers: {err}",
                self.path.display()
            ))
        })
    }

    async fn write(&self, config: &BalanceConfig) -> TuningResult<()> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| TuningError::Storage(format!("failed to serialize config: {err}")))?;

        tokio::fs::write(&self.path, json).await.map_err(|err| {
            TuningError::Storage(format!("failed to write {}: {err}", self.path.display()))
        })?;

        info!(path = %self.path.display(), parameters = config.len(), "balance config written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Number;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_reads_defaults() {
        let dir = TempDir::new().unwrap();
        let store = JsonConfigStore::in_project(dir.path());

        let config = store.read().await.unwrap();
        assert_eq!(config, BalanceConfig::defaults());
        assert!(!store.path().exists(), "reading must not create the file");
    }

    #[tokio::test]
    async fn test_written_file_is_sorted_and_indented() {
        let dir = TempDir::new().unwrap();
        let store = JsonConfigStore::in_project(dir.path());
        let config: BalanceConfig = [("wall_cost", 10), ("archer_cost", 80)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), Number::from(v)))
            .collect();

        store.write(&config).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "{\n  \"archer_cost\": 80,\n  \"wall_cost\": 10\n}");
    }

    #[tokio::test]
    async fn test_malformed_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonConfigStore::in_project(dir.path());
        std::fs::write(store.path(), "{ not json").unwrap();

        let result = store.read().await;
        assert!(matches!(result, Err(TuningError::Storage(_))));
    }
}
