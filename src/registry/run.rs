//! Evaluation run records from the tracking side of the store

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::keys::TagKey;

/// Status of a tracked run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run completed successfully
    Finished,
    /// Run is still executing
    Running,
    /// Run ended in error
    Failed,
}

/// A tracked evaluation run.
///
/// Correlated to the training run it scored via the `source_run_id`
/// tag. Only `Finished` runs are eligible for metric lookup; a training
/// run may be evaluated more than once and the latest evaluation wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRun {
    /// Unique run identifier
    pub run_id: String,
    /// Current status
    pub status: RunStatus,
    /// Unix timestamp (ms) when the run ended, if it has ended
    pub end_time_ms: Option<i64>,
    /// Final metric values recorded by the run
    pub metrics: HashMap<String, f64>,
    /// Tags: key -> value
    pub tags: HashMap<String, String>,
}

impl EvaluationRun {
    /// Create a run with no metrics or tags.
    pub fn new(run_id: &str, status: RunStatus) -> Self {
        Self {
            run_id: run_id.to_string(),
            status,
            end_time_ms: None,
            metrics: HashMap::new(),
            tags: HashMap::new(),
        }
    }

    /// Tag this run as the evaluation of `training_run_id`.
    pub fn evaluating(mut self, training_run_id: &str) -> Self {
        self.tags
            .insert(TagKey::SourceRunId.as_str().to_string(), training_run_id.to_string());
        self
    }

    /// Set the end timestamp (Unix ms).
    pub fn ended_at(mut self, end_time_ms: i64) -> Self {
        self.end_time_ms = Some(end_time_ms);
        self
    }

    /// Record a metric value.
    pub fn with_metric(mut self, key: &str, value: f64) -> Self {
        self.metrics.insert(key.to_string(), value);
        self
    }

    /// The training run this run evaluated, if tagged.
    pub fn source_run_id(&self) -> Option<&str> {
        self.tags.get(TagKey::SourceRunId.as_str()).map(String::as_str)
    }
}

/// Typed query over tracked runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunQuery {
    /// Match runs whose `source_run_id` tag equals this value
    pub source_run_id: Option<String>,
    /// Match runs in this status
    pub status: Option<RunStatus>,
}

impl RunQuery {
    /// Finished evaluation runs of the given training run.
    pub fn finished_evaluations_of(training_run_id: &str) -> Self {
        Self {
            source_run_id: Some(training_run_id.to_string()),
            status: Some(RunStatus::Finished),
        }
    }

    /// Whether `run` satisfies every populated field.
    pub fn matches(&self, run: &EvaluationRun) -> bool {
        if let Some(source) = &self.source_run_id {
            if run.source_run_id() != Some(source.as_str()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if run.status != status {
                return false;
            }
        }
        true
    }
}
