//! Promotion request configuration

use serde::{Deserialize, Serialize};

use super::error::{PromotionError, Result};
use crate::registry::MetricKey;

/// Parameters of a single promotion attempt.
///
/// Deserializable from pipeline configuration; every field except the
/// model name carries the conventional default (`staging` ->
/// `champion`, guarded on F1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionRequest {
    /// Registered model whose alias is being reassigned
    pub model: String,
    /// Explicit candidate version; the latest version when omitted
    #[serde(default)]
    pub version: Option<u32>,
    /// Staging marker cleared on success
    #[serde(default = "default_from_alias")]
    pub from_alias: String,
    /// Alias receiving the candidate
    #[serde(default = "default_to_alias")]
    pub to_alias: String,
    /// Metric compared by the improvement guard
    #[serde(default = "default_metric")]
    pub metric: MetricKey,
    /// Require the candidate to strictly improve on the current holder
    #[serde(default = "default_require_improvement")]
    pub require_improvement: bool,
}

fn default_from_alias() -> String {
    "staging".to_string()
}

fn default_to_alias() -> String {
    "champion".to_string()
}

fn default_metric() -> MetricKey {
    MetricKey::F1Score
}

fn default_require_improvement() -> bool {
    true
}

impl PromotionRequest {
    /// A request for `model` with all defaults.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            version: None,
            from_alias: default_from_alias(),
            to_alias: default_to_alias(),
            metric: default_metric(),
            require_improvement: default_require_improvement(),
        }
    }

    /// Pin an explicit candidate version.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    /// Override the alias pair.
    pub fn with_aliases(mut self, from_alias: &str, to_alias: &str) -> Self {
        self.from_alias = from_alias.to_string();
        self.to_alias = to_alias.to_string();
        self
    }

    /// Override the guard metric.
    pub fn with_metric(mut self, metric: MetricKey) -> Self {
        self.metric = metric;
        self
    }

    /// Drop the improvement guard.
    pub fn unguarded(mut self) -> Self {
        self.require_improvement = false;
        self
    }

    /// Reject structurally invalid requests before any remote call.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(PromotionError::InvalidRequest("model name is empty".to_string()));
        }
        if self.from_alias.trim().is_empty() || self.to_alias.trim().is_empty() {
            return Err(PromotionError::InvalidRequest(
                "alias names must be non-empty".to_string(),
            ));
        }
        if self.from_alias == self.to_alias {
            return Err(PromotionError::InvalidRequest(format!(
                "source and target alias are both '{}'",
                self.from_alias
            )));
        }
        Ok(())
    }
}
