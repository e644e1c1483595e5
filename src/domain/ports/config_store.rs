use async_trait::async_trait;

use crate::domain::errors::TuningResult;
use crate::domain::models::{BalanceConfig, ParameterChanges};

/// Persisted balance configuration.
///
/// `apply_changes` is the only mutation path the convergence loop uses. The
/// provided implementation reads, merges through [`BalanceConfig::merge`], and
/// writes, so the key set of the stored document never changes.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Current document, or the defaults when nothing is persisted yet.
    ///
    /// A persisted document that cannot be parsed is a storage error; it must
    /// not silently fall back to defaults.
    async fn read(&self) -> TuningResult<BalanceConfig>;

    /// Replace the persisted document.
    async fn write(&self, config: &BalanceConfig) -> TuningResult<()>;

    /// Merge `changes` into the current document, persist, and return it.
    async fn apply_changes(&self, changes: &ParameterChanges) -> TuningResult<BalanceConfig> {
        let mut config = self.read().await?;
        config.merge(changes);
        self.write(&config).await?;
        Ok(config)
    }
}
