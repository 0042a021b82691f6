//! JSON file-backed registry
//!
//! Persists the full registry state as a single JSON document, written
//! after every mutation. Intended for local development and integration
//! tests; production deployments reach the remote registry service
//! through their own [`RegistryClient`] implementation.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{RegistryError, Result};
use super::memory::{InMemoryRegistry, RegistrySnapshot};
use super::model::{ModelVersion, RegisteredModel, VersionFilter};
use super::run::{EvaluationRun, RunQuery};
use super::stage::ModelStage;
use super::traits::RegistryClient;

/// File-backed registry storing its state as one JSON document.
#[derive(Debug)]
pub struct JsonFileRegistry {
    path: PathBuf,
    inner: InMemoryRegistry,
}

impl JsonFileRegistry {
    /// Open the registry at `path`, starting empty if the file does not
    /// exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = if path.exists() {
            let json = fs::read_to_string(&path).map_err(transport)?;
            let snapshot: RegistrySnapshot = serde_json::from_str(&json).map_err(transport)?;
            InMemoryRegistry::from_snapshot(snapshot)
        } else {
            InMemoryRegistry::new()
        };
        Ok(Self { path, inner })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seed a tracked run and persist. See [`InMemoryRegistry::insert_run`].
    pub fn insert_run(&mut self, run: EvaluationRun) -> Result<()> {
        self.inner.insert_run(run);
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.inner.snapshot()).map_err(transport)?;
        fs::write(&self.path, json).map_err(transport)?;
        Ok(())
    }
}

/// File and serialization failures are this backend's transport errors.
fn transport<E: std::fmt::Display>(err: E) -> RegistryError {
    RegistryError::Transport(err.to_string())
}

impl RegistryClient for JsonFileRegistry {
    fn get_registered_model(&self, name: &str) -> Result<Option<RegisteredModel>> {
        self.inner.get_registered_model(name)
    }

    fn create_registered_model(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<RegisteredModel> {
        let model = self.inner.create_registered_model(name, description)?;
        self.persist()?;
        Ok(model)
    }

    fn list_registered_models(&self, max_results: usize) -> Result<Vec<RegisteredModel>> {
        self.inner.list_registered_models(max_results)
    }

    fn create_model_version(
        &mut self,
        name: &str,
        source: &str,
        run_id: Option<&str>,
        description: Option<&str>,
    ) -> Result<ModelVersion> {
        let version = self
            .inner
            .create_model_version(name, source, run_id, description)?;
        self.persist()?;
        Ok(version)
    }

    fn get_model_version(&self, name: &str, version: u32) -> Result<ModelVersion> {
        self.inner.get_model_version(name, version)
    }

    fn delete_model_version(&mut self, name: &str, version: u32) -> Result<()> {
        self.inner.delete_model_version(name, version)?;
        self.persist()
    }

    fn set_version_tag(&mut self, name: &str, version: u32, key: &str, value: &str) -> Result<()> {
        self.inner.set_version_tag(name, version, key, value)?;
        self.persist()
    }

    fn set_alias(&mut self, name: &str, alias: &str, version: u32) -> Result<()> {
        self.inner.set_alias(name, alias, version)?;
        self.persist()
    }

    fn delete_alias(&mut self, name: &str, alias: &str) -> Result<()> {
        self.inner.delete_alias(name, alias)?;
        self.persist()
    }

    fn get_version_by_alias(&self, name: &str, alias: &str) -> Result<Option<ModelVersion>> {
        self.inner.get_version_by_alias(name, alias)
    }

    fn get_latest_versions(
        &self,
        name: &str,
        stages: Option<&[ModelStage]>,
    ) -> Result<Vec<ModelVersion>> {
        self.inner.get_latest_versions(name, stages)
    }

    fn transition_stage(
        &mut self,
        name: &str,
        version: u32,
        stage: ModelStage,
        archive_existing: bool,
    ) -> Result<ModelVersion> {
        let transitioned = self
            .inner
            .transition_stage(name, version, stage, archive_existing)?;
        self.persist()?;
        Ok(transitioned)
    }

    fn search_versions(
        &self,
        filter: &VersionFilter,
        max_results: usize,
    ) -> Result<Vec<ModelVersion>> {
        self.inner.search_versions(filter, max_results)
    }

    fn get_run(&self, run_id: &str) -> Result<EvaluationRun> {
        self.inner.get_run(run_id)
    }

    fn search_runs(&self, query: &RunQuery) -> Result<Vec<EvaluationRun>> {
        self.inner.search_runs(query)
    }
}
