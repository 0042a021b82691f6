//! Promotion outcomes and reasons

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registry::MetricKey;

/// Result of a promotion attempt.
///
/// `Blocked` is the guard functioning as designed, not a failure;
/// remediation belongs only to errors. `Blocked` and `Aborted` both
/// leave registry state unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PromotionOutcome {
    /// The target alias now points at `version`.
    Promoted {
        version: u32,
        /// Delta over the previous holder, when both metrics resolved.
        /// Reportable only; nothing persists it.
        improvement: Option<MetricImprovement>,
    },
    /// The guard rejected the candidate.
    Blocked(BlockReason),
    /// The attempt could not be evaluated.
    Aborted(AbortReason),
}

impl PromotionOutcome {
    /// Whether the alias was reassigned.
    pub fn is_promoted(&self) -> bool {
        matches!(self, PromotionOutcome::Promoted { .. })
    }
}

impl fmt::Display for PromotionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromotionOutcome::Promoted {
                version,
                improvement: Some(improvement),
            } => write!(f, "promoted v{version}, improvement {improvement}"),
            PromotionOutcome::Promoted {
                version,
                improvement: None,
            } => write!(f, "promoted v{version}"),
            PromotionOutcome::Blocked(reason) => write!(f, "blocked: {reason}"),
            PromotionOutcome::Aborted(reason) => write!(f, "aborted: {reason}"),
        }
    }
}

/// Business-rule rejections. State is unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockReason {
    /// The candidate does not strictly improve the guard metric over
    /// the current holder.
    Regression {
        metric: MetricKey,
        candidate_version: u32,
        candidate_value: f64,
        baseline_version: u32,
        baseline_value: f64,
    },
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::Regression {
                metric,
                candidate_version,
                candidate_value,
                baseline_version,
                baseline_value,
            } => write!(
                f,
                "candidate v{candidate_version} does not improve {metric} over v{baseline_version}: {candidate_value:.4} <= {baseline_value:.4}"
            ),
        }
    }
}

/// Conditions under which the attempt cannot be evaluated. State is
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AbortReason {
    /// The model has no versions to promote.
    NoVersions { model: String },
    /// No finished evaluation of the candidate recorded the guard
    /// metric. A candidate that cannot prove itself never ships.
    CandidateMetricMissing { version: u32, metric: MetricKey },
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::NoVersions { model } => {
                write!(f, "no versions found for model {model}")
            }
            AbortReason::CandidateMetricMissing { version, metric } => {
                write!(f, "candidate v{version} has no recorded {metric} metric")
            }
        }
    }
}

/// Improvement of the candidate over the previous holder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricImprovement {
    /// `candidate - baseline`
    pub absolute: f64,
    /// Absolute improvement as a percentage of the baseline
    pub relative_pct: f64,
}

impl MetricImprovement {
    /// Delta of `candidate` over `baseline`.
    pub fn between(candidate: f64, baseline: f64) -> Self {
        let absolute = candidate - baseline;
        Self {
            absolute,
            relative_pct: absolute / baseline * 100.0,
        }
    }
}

impl fmt::Display for MetricImprovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.4} ({:+.2}%)", self.absolute, self.relative_pct)
    }
}
