//! Registry client trait definition

use super::error::Result;
use super::model::{ModelVersion, RegisteredModel, VersionFilter};
use super::run::{EvaluationRun, RunQuery};
use super::stage::ModelStage;

/// Narrow, typed interface over a versioned model registry and its
/// tracking store.
///
/// All operations are synchronous calls against the backing store; the
/// store owns all persistent state and assigns version numbers.
/// Implementations fail with [`RegistryError::Transport`](super::RegistryError::Transport)
/// on service failure and with the dedicated not-found variants
/// otherwise. Absence that callers are expected to recover from (model
/// probes, alias lookups) is `Ok(None)`, never an error.
pub trait RegistryClient: Send + Sync {
    /// Look up a registered model by name.
    fn get_registered_model(&self, name: &str) -> Result<Option<RegisteredModel>>;

    /// Create a registered model. Fails with `ModelAlreadyExists` when
    /// the name is taken.
    fn create_registered_model(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<RegisteredModel>;

    /// List registered models, ordered by name.
    fn list_registered_models(&self, max_results: usize) -> Result<Vec<RegisteredModel>>;

    /// Create a new version of `name` from `source`. Always assigns a
    /// fresh version number; identical sources are never deduplicated.
    fn create_model_version(
        &mut self,
        name: &str,
        source: &str,
        run_id: Option<&str>,
        description: Option<&str>,
    ) -> Result<ModelVersion>;

    /// Get a specific model version.
    fn get_model_version(&self, name: &str, version: u32) -> Result<ModelVersion>;

    /// Delete a model version. Any alias pointing at it is removed with
    /// it, so an alias can never dangle.
    fn delete_model_version(&mut self, name: &str, version: u32) -> Result<()>;

    /// Set a tag on a model version.
    fn set_version_tag(&mut self, name: &str, version: u32, key: &str, value: &str) -> Result<()>;

    /// Point `alias` at `version`. The version must exist.
    fn set_alias(&mut self, name: &str, alias: &str, version: u32) -> Result<()>;

    /// Delete an alias. Deleting an absent alias is a success.
    fn delete_alias(&mut self, name: &str, alias: &str) -> Result<()>;

    /// Resolve an alias to its version, or `None` when unassigned.
    fn get_version_by_alias(&self, name: &str, alias: &str) -> Result<Option<ModelVersion>>;

    /// The highest-numbered version per lifecycle stage, optionally
    /// restricted to `stages`. Ordered by version number.
    fn get_latest_versions(
        &self,
        name: &str,
        stages: Option<&[ModelStage]>,
    ) -> Result<Vec<ModelVersion>>;

    /// Move a version to `stage`. With `archive_existing`, other
    /// versions currently in that stage are moved to `Archived`.
    fn transition_stage(
        &mut self,
        name: &str,
        version: u32,
        stage: ModelStage,
        archive_existing: bool,
    ) -> Result<ModelVersion>;

    /// Search versions across models, ordered by (model, version).
    fn search_versions(&self, filter: &VersionFilter, max_results: usize)
        -> Result<Vec<ModelVersion>>;

    /// Get a tracked run by id.
    fn get_run(&self, run_id: &str) -> Result<EvaluationRun>;

    /// Search tracked runs, ordered by run id.
    fn search_runs(&self, query: &RunQuery) -> Result<Vec<EvaluationRun>>;
}
