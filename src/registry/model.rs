//! Registry entities: registered models, versions, aliases

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stage::ModelStage;

/// A named model owning zero or more versions.
///
/// Created lazily on first registration and never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredModel {
    /// Unique model name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last time a version was added, removed, or transitioned
    pub last_updated_at: DateTime<Utc>,
}

/// A single version of a registered model.
///
/// The version number is assigned by the store and increases
/// monotonically per model; ordering is numeric by construction. The
/// source URI and run correlation are immutable once created; tags and
/// stage are the only mutable adjuncts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVersion {
    /// Owning model name
    pub name: String,
    /// Store-assigned version number
    pub version: u32,
    /// Current lifecycle stage
    pub stage: ModelStage,
    /// URI of the artifact this version was registered from
    pub source: String,
    /// Training run that produced the artifact, when known
    pub run_id: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Version tags
    pub tags: HashMap<String, String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ModelVersion {
    /// Create a new model version at stage `None`.
    pub fn new(name: &str, version: u32, source: &str) -> Self {
        Self {
            name: name.to_string(),
            version,
            stage: ModelStage::None,
            source: source.to_string(),
            run_id: None,
            description: None,
            tags: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Correlate with the training run that produced the artifact.
    pub fn with_run_id(mut self, run_id: &str) -> Self {
        self.run_id = Some(run_id.to_string());
        self
    }

    /// Set description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Add a tag.
    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }
}

/// A single alias pointer at rest: `(model, alias) -> version`.
///
/// An alias resolves to exactly one existing version; multiple aliases
/// may point at the same version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasAssignment {
    /// Owning model name
    pub model: String,
    /// Alias name (e.g. "champion", "staging")
    pub alias: String,
    /// Version the alias resolves to
    pub version: u32,
}

/// Typed search filter for model versions.
///
/// Replaces the free-form filter strings of the backing store's search
/// API with fields this crate actually queries by.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionFilter {
    /// Restrict to versions of this model
    pub name: Option<String>,
    /// Restrict to versions produced by this training run
    pub run_id: Option<String>,
}

impl VersionFilter {
    /// Filter to all versions of one model.
    pub fn by_name(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Whether `version` satisfies every populated field.
    pub fn matches(&self, version: &ModelVersion) -> bool {
        if let Some(name) = &self.name {
            if version.name != *name {
                return false;
            }
        }
        if let Some(run_id) = &self.run_id {
            if version.run_id.as_deref() != Some(run_id.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Aggregate view of a registered model and its versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
    /// One line per version, ordered by version number
    pub versions: Vec<VersionSummary>,
}

/// Per-version line in a [`ModelInfo`] report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionSummary {
    pub version: u32,
    pub stage: ModelStage,
    pub run_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&ModelVersion> for VersionSummary {
    fn from(version: &ModelVersion) -> Self {
        Self {
            version: version.version,
            stage: version.stage,
            run_id: version.run_id.clone(),
            created_at: version.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_version_new() {
        let version = ModelVersion::new("churn", 1, "runs:/abc/model");
        assert_eq!(version.name, "churn");
        assert_eq!(version.version, 1);
        assert_eq!(version.stage, ModelStage::None);
        assert!(version.run_id.is_none());
        assert!(version.tags.is_empty());
    }

    #[test]
    fn test_model_version_builders() {
        let version = ModelVersion::new("churn", 2, "/artifacts/v2")
            .with_run_id("run-7")
            .with_description("quarterly retrain")
            .with_tag("framework", "xgboost");
        assert_eq!(version.run_id.as_deref(), Some("run-7"));
        assert_eq!(version.description.as_deref(), Some("quarterly retrain"));
        assert_eq!(version.tags.get("framework").map(String::as_str), Some("xgboost"));
    }

    #[test]
    fn test_version_filter_by_name() {
        let filter = VersionFilter::by_name("churn");
        assert!(filter.matches(&ModelVersion::new("churn", 1, "/a")));
        assert!(!filter.matches(&ModelVersion::new("fraud", 1, "/a")));
    }

    #[test]
    fn test_version_filter_by_run_id() {
        let filter = VersionFilter {
            run_id: Some("run-1".to_string()),
            ..VersionFilter::default()
        };
        assert!(filter.matches(&ModelVersion::new("churn", 1, "/a").with_run_id("run-1")));
        assert!(!filter.matches(&ModelVersion::new("churn", 2, "/a").with_run_id("run-2")));
        assert!(!filter.matches(&ModelVersion::new("churn", 3, "/a")));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = VersionFilter::default();
        assert!(filter.matches(&ModelVersion::new("anything", 9, "/a")));
    }
}
