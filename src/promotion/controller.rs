//! Guarded alias reassignment

use tracing::{info, warn};

use super::error::Result;
use super::outcome::{AbortReason, BlockReason, MetricImprovement, PromotionOutcome};
use super::request::PromotionRequest;
use super::resolver::resolve_metric;
use crate::registry::{
    MetricKey, ModelInfo, ModelVersion, RegistryClient, RegistryError, TagKey, VersionFilter,
    VersionSummary,
};

/// Outcome of a [`PromotionController::register`] call.
#[derive(Debug)]
pub struct Registration {
    /// The freshly created version
    pub version: ModelVersion,
    /// Tags that could not be attached, with the failure for each.
    /// Tag attachment never fails the registration itself.
    pub failed_tags: Vec<(TagKey, RegistryError)>,
}

/// Orchestrates guarded alias reassignment against a caller-owned
/// registry client.
///
/// Holds no state beyond the client handle; construct one per pipeline
/// run or share one per process as the caller sees fit. Transport
/// failures from the client surface unchanged; this layer performs no
/// retries and cannot cancel an in-flight call.
///
/// The alias swap is delete-then-create across two remote calls, not a
/// transaction: there is a brief window in which the target alias is
/// unassigned, and concurrent promotions of the same (model, alias)
/// pair resolve as last-writer-wins. Consumers needing a stable view
/// must pin a version at read time instead of re-resolving the alias.
pub struct PromotionController<C: RegistryClient> {
    client: C,
}

impl<C: RegistryClient> PromotionController<C> {
    /// Wrap a client.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Shared access to the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Exclusive access to the underlying client.
    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    /// Consume the controller, returning the client.
    pub fn into_client(self) -> C {
        self.client
    }

    /// Attempt to promote a candidate version of `request.model` to
    /// `request.to_alias`.
    ///
    /// Resolves the candidate (explicit version, else the
    /// numerically-largest), compares it against the current alias
    /// holder when the guard is on, then reassigns the alias by
    /// idempotent delete and create. Returns the outcome; `Blocked`
    /// and `Aborted` leave the registry untouched.
    pub fn promote(&mut self, request: &PromotionRequest) -> Result<PromotionOutcome> {
        request.validate()?;

        let candidate = match request.version {
            Some(version) => self.client.get_model_version(&request.model, version)?,
            None => {
                info!(model = %request.model, "no version specified, resolving latest");
                let versions = self.client.get_latest_versions(&request.model, None)?;
                match versions.into_iter().max_by_key(|v| v.version) {
                    Some(version) => version,
                    None => {
                        warn!(model = %request.model, "no versions to promote");
                        return Ok(PromotionOutcome::Aborted(AbortReason::NoVersions {
                            model: request.model.clone(),
                        }));
                    }
                }
            }
        };
        info!(
            model = %request.model,
            version = candidate.version,
            from = %request.from_alias,
            to = %request.to_alias,
            "promoting"
        );

        // Absence of a current holder is not an error: the alias is
        // simply unassigned and the candidate takes it without a fight.
        let existing = self
            .client
            .get_version_by_alias(&request.model, &request.to_alias)?;

        let mut improvement = None;
        if let Some(existing) = &existing {
            if request.require_improvement {
                match self.compare(request.metric, &candidate, existing)? {
                    Comparison::Improved(delta) => improvement = Some(delta),
                    Comparison::BaselineUnmeasurable => {}
                    Comparison::Regressed(value, baseline) => {
                        info!(
                            model = %request.model,
                            candidate = candidate.version,
                            baseline = existing.version,
                            "promotion blocked, candidate does not improve"
                        );
                        return Ok(PromotionOutcome::Blocked(BlockReason::Regression {
                            metric: request.metric,
                            candidate_version: candidate.version,
                            candidate_value: value,
                            baseline_version: existing.version,
                            baseline_value: baseline,
                        }));
                    }
                    Comparison::CandidateUnmeasurable => {
                        warn!(
                            model = %request.model,
                            version = candidate.version,
                            metric = %request.metric,
                            "candidate has no recorded guard metric, aborting"
                        );
                        return Ok(PromotionOutcome::Aborted(AbortReason::CandidateMetricMissing {
                            version: candidate.version,
                            metric: request.metric,
                        }));
                    }
                }
            }
        }

        // Reassignment is delete-then-create; both deletes are
        // idempotent so a retry after partial failure converges.
        self.client.delete_alias(&request.model, &request.to_alias)?;
        self.client.delete_alias(&request.model, &request.from_alias)?;
        self.client
            .set_alias(&request.model, &request.to_alias, candidate.version)?;

        info!(
            model = %request.model,
            alias = %request.to_alias,
            version = candidate.version,
            "alias reassigned"
        );
        Ok(PromotionOutcome::Promoted {
            version: candidate.version,
            improvement,
        })
    }

    /// Register `source` as a new version of `model_name`.
    ///
    /// The registered model is created on first use; losing a creation
    /// race to a concurrent caller is recovered, which makes
    /// registration idempotent at the model-existence level. Every
    /// registration creates a fresh version. Tag attachment failures
    /// are collected per tag and never fail the registration.
    pub fn register(
        &mut self,
        source: &str,
        model_name: &str,
        tags: &[(TagKey, &str)],
        description: Option<&str>,
    ) -> Result<Registration> {
        info!(model = %model_name, source = %source, "registering model version");

        if self.client.get_registered_model(model_name)?.is_none() {
            info!(model = %model_name, "registered model not found, creating it");
            match self.client.create_registered_model(model_name, description) {
                Ok(_) => {}
                Err(RegistryError::ModelAlreadyExists(_)) => {
                    warn!(model = %model_name, "model already exists, continuing");
                }
                Err(err) => return Err(err.into()),
            }
        }

        let run_id = run_id_from_source(source);
        let version =
            self.client
                .create_model_version(model_name, source, run_id, description)?;

        let mut failed_tags = Vec::new();
        for (key, value) in tags {
            if let Err(err) =
                self.client
                    .set_version_tag(model_name, version.version, key.as_str(), value)
            {
                warn!(
                    model = %model_name,
                    version = version.version,
                    tag = %key,
                    error = %err,
                    "failed to attach version tag"
                );
                failed_tags.push((*key, err));
            }
        }

        info!(model = %model_name, version = version.version, "model registered");
        Ok(Registration {
            version,
            failed_tags,
        })
    }

    /// Aggregate view of a registered model and all its versions.
    pub fn model_info(&self, name: &str) -> Result<ModelInfo> {
        let model = self
            .client
            .get_registered_model(name)?
            .ok_or_else(|| RegistryError::ModelNotFound(name.to_string()))?;
        let versions = self
            .client
            .search_versions(&VersionFilter::by_name(name), usize::MAX)?;
        Ok(ModelInfo {
            name: model.name,
            description: model.description,
            created_at: model.created_at,
            last_updated_at: model.last_updated_at,
            versions: versions.iter().map(VersionSummary::from).collect(),
        })
    }

    /// Guard comparison of candidate against the current holder.
    fn compare(
        &self,
        metric: MetricKey,
        candidate: &ModelVersion,
        existing: &ModelVersion,
    ) -> Result<Comparison> {
        let candidate_value = match candidate.run_id.as_deref() {
            Some(run_id) => resolve_metric(&self.client, run_id, metric)?,
            None => None,
        };
        // Fail closed: a candidate that cannot prove itself never ships.
        let Some(candidate_value) = candidate_value else {
            return Ok(Comparison::CandidateUnmeasurable);
        };

        let baseline_value = match existing.run_id.as_deref() {
            Some(run_id) => resolve_metric(&self.client, run_id, metric)?,
            None => None,
        };
        // An unmeasurable baseline cannot block promotion.
        let Some(baseline_value) = baseline_value else {
            warn!(
                version = existing.version,
                metric = %metric,
                "current holder has no recorded guard metric, proceeding"
            );
            return Ok(Comparison::BaselineUnmeasurable);
        };

        info!(
            metric = %metric,
            candidate = candidate_value,
            baseline = baseline_value,
            "comparing guard metric"
        );
        if candidate_value <= baseline_value {
            Ok(Comparison::Regressed(candidate_value, baseline_value))
        } else {
            Ok(Comparison::Improved(MetricImprovement::between(
                candidate_value,
                baseline_value,
            )))
        }
    }
}

enum Comparison {
    Improved(MetricImprovement),
    Regressed(f64, f64),
    CandidateUnmeasurable,
    BaselineUnmeasurable,
}

/// Extract the training run id from a `runs:/<run_id>/...` source URI.
fn run_id_from_source(source: &str) -> Option<&str> {
    source
        .strip_prefix("runs:/")
        .and_then(|rest| rest.split('/').find(|segment| !segment.is_empty()))
}
