//! Well-known metric and tag vocabularies
//!
//! The backing store keys metrics and tags by free-form strings. Inside
//! this crate the known vocabulary is enumerated, so a misspelled
//! metric name is a compile error rather than a lookup that quietly
//! finds nothing.

use serde::{Deserialize, Serialize};

/// Evaluation metrics recognized by the promotion guard.
///
/// `as_str` gives the key the tracking store records the metric under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    F1Score,
    Accuracy,
    Precision,
    Recall,
    RocAuc,
}

impl MetricKey {
    /// Key under which the tracking store records this metric.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::F1Score => "f1_score",
            MetricKey::Accuracy => "accuracy",
            MetricKey::Precision => "precision",
            MetricKey::Recall => "recall",
            MetricKey::RocAuc => "roc_auc",
        }
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tag keys with meaning to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKey {
    /// Correlates an evaluation run to the training run it scored
    SourceRunId,
    /// Pipeline or user that produced the version
    TrainedBy,
    /// Training framework the artifact was built with
    Framework,
}

impl TagKey {
    /// Key under which the store records this tag.
    pub fn as_str(self) -> &'static str {
        match self {
            TagKey::SourceRunId => "source_run_id",
            TagKey::TrainedBy => "trained_by",
            TagKey::Framework => "framework",
        }
    }
}

impl std::fmt::Display for TagKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
