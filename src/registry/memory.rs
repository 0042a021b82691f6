//! In-memory registry implementation

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::error::{RegistryError, Result};
use super::model::{AliasAssignment, ModelVersion, RegisteredModel, VersionFilter};
use super::run::{EvaluationRun, RunQuery};
use super::stage::ModelStage;
use super::traits::RegistryClient;

/// In-memory registry: reference implementation and test double.
///
/// Holds the same entities the remote service would (registered
/// models, versions, alias pointers, tracked runs) behind the
/// [`RegistryClient`] trait.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    models: HashMap<String, RegisteredModel>,
    /// Versions per model, keyed by version number
    versions: HashMap<String, BTreeMap<u32, ModelVersion>>,
    /// (model name, alias) -> version number
    aliases: HashMap<(String, String), u32>,
    runs: HashMap<String, EvaluationRun>,
}

/// Serializable snapshot of the full registry state.
///
/// Flat, deterministically ordered vectors rather than keyed maps, so
/// the document diffs cleanly and survives JSON's string-keyed maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub models: Vec<RegisteredModel>,
    pub versions: Vec<ModelVersion>,
    pub aliases: Vec<AliasAssignment>,
    pub runs: Vec<EvaluationRun>,
}

impl InMemoryRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a tracked run.
    ///
    /// The real tracking store records runs out-of-band of this client;
    /// tests and local pipelines insert them here.
    pub fn insert_run(&mut self, run: EvaluationRun) {
        self.runs.insert(run.run_id.clone(), run);
    }

    /// Export the full state, deterministically ordered.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut models: Vec<_> = self.models.values().cloned().collect();
        models.sort_by(|a, b| a.name.cmp(&b.name));

        let mut versions: Vec<_> = self
            .versions
            .values()
            .flat_map(|by_number| by_number.values())
            .cloned()
            .collect();
        versions.sort_by(|a, b| (a.name.as_str(), a.version).cmp(&(b.name.as_str(), b.version)));

        let mut aliases: Vec<_> = self
            .aliases
            .iter()
            .map(|((model, alias), version)| AliasAssignment {
                model: model.clone(),
                alias: alias.clone(),
                version: *version,
            })
            .collect();
        aliases.sort_by(|a, b| (a.model.as_str(), a.alias.as_str()).cmp(&(b.model.as_str(), b.alias.as_str())));

        let mut runs: Vec<_> = self.runs.values().cloned().collect();
        runs.sort_by(|a, b| a.run_id.cmp(&b.run_id));

        RegistrySnapshot {
            models,
            versions,
            aliases,
            runs,
        }
    }

    /// Rebuild a registry from an exported snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Self {
        let mut registry = Self::new();
        for model in snapshot.models {
            registry.models.insert(model.name.clone(), model);
        }
        for version in snapshot.versions {
            registry
                .versions
                .entry(version.name.clone())
                .or_default()
                .insert(version.version, version);
        }
        for assignment in snapshot.aliases {
            registry
                .aliases
                .insert((assignment.model, assignment.alias), assignment.version);
        }
        for run in snapshot.runs {
            registry.runs.insert(run.run_id.clone(), run);
        }
        registry
    }

    fn next_version(&self, name: &str) -> u32 {
        self.versions
            .get(name)
            .and_then(|by_number| by_number.keys().next_back())
            .map_or(1, |max| max + 1)
    }

    fn touch(&mut self, name: &str) {
        if let Some(model) = self.models.get_mut(name) {
            model.last_updated_at = Utc::now();
        }
    }
}

impl RegistryClient for InMemoryRegistry {
    fn get_registered_model(&self, name: &str) -> Result<Option<RegisteredModel>> {
        Ok(self.models.get(name).cloned())
    }

    fn create_registered_model(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<RegisteredModel> {
        if self.models.contains_key(name) {
            return Err(RegistryError::ModelAlreadyExists(name.to_string()));
        }
        let now = Utc::now();
        let model = RegisteredModel {
            name: name.to_string(),
            description: description.map(str::to_string),
            created_at: now,
            last_updated_at: now,
        };
        self.models.insert(name.to_string(), model.clone());
        Ok(model)
    }

    fn list_registered_models(&self, max_results: usize) -> Result<Vec<RegisteredModel>> {
        let mut models: Vec<_> = self.models.values().cloned().collect();
        models.sort_by(|a, b| a.name.cmp(&b.name));
        models.truncate(max_results);
        Ok(models)
    }

    fn create_model_version(
        &mut self,
        name: &str,
        source: &str,
        run_id: Option<&str>,
        description: Option<&str>,
    ) -> Result<ModelVersion> {
        if !self.models.contains_key(name) {
            return Err(RegistryError::ModelNotFound(name.to_string()));
        }
        let number = self.next_version(name);
        let mut version = ModelVersion::new(name, number, source);
        if let Some(run_id) = run_id {
            version = version.with_run_id(run_id);
        }
        if let Some(description) = description {
            version = version.with_description(description);
        }
        self.versions
            .entry(name.to_string())
            .or_default()
            .insert(number, version.clone());
        self.touch(name);
        Ok(version)
    }

    fn get_model_version(&self, name: &str, version: u32) -> Result<ModelVersion> {
        self.versions
            .get(name)
            .and_then(|by_number| by_number.get(&version))
            .cloned()
            .ok_or_else(|| RegistryError::VersionNotFound(name.to_string(), version))
    }

    fn delete_model_version(&mut self, name: &str, version: u32) -> Result<()> {
        let removed = self
            .versions
            .get_mut(name)
            .and_then(|by_number| by_number.remove(&version));
        if removed.is_none() {
            return Err(RegistryError::VersionNotFound(name.to_string(), version));
        }
        // An alias must never dangle; aliases on the removed version go with it.
        self.aliases
            .retain(|(model, _), target| !(model == name && *target == version));
        self.touch(name);
        Ok(())
    }

    fn set_version_tag(&mut self, name: &str, version: u32, key: &str, value: &str) -> Result<()> {
        let entry = self
            .versions
            .get_mut(name)
            .and_then(|by_number| by_number.get_mut(&version))
            .ok_or_else(|| RegistryError::VersionNotFound(name.to_string(), version))?;
        entry.tags.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_alias(&mut self, name: &str, alias: &str, version: u32) -> Result<()> {
        let exists = self
            .versions
            .get(name)
            .map_or(false, |by_number| by_number.contains_key(&version));
        if !exists {
            return Err(RegistryError::VersionNotFound(name.to_string(), version));
        }
        self.aliases
            .insert((name.to_string(), alias.to_string()), version);
        Ok(())
    }

    fn delete_alias(&mut self, name: &str, alias: &str) -> Result<()> {
        self.aliases.remove(&(name.to_string(), alias.to_string()));
        Ok(())
    }

    fn get_version_by_alias(&self, name: &str, alias: &str) -> Result<Option<ModelVersion>> {
        let target = self.aliases.get(&(name.to_string(), alias.to_string()));
        Ok(target.and_then(|version| {
            self.versions
                .get(name)
                .and_then(|by_number| by_number.get(version))
                .cloned()
        }))
    }

    fn get_latest_versions(
        &self,
        name: &str,
        stages: Option<&[ModelStage]>,
    ) -> Result<Vec<ModelVersion>> {
        if !self.models.contains_key(name) {
            return Err(RegistryError::ModelNotFound(name.to_string()));
        }
        let Some(by_number) = self.versions.get(name) else {
            return Ok(Vec::new());
        };
        let mut latest: HashMap<ModelStage, &ModelVersion> = HashMap::new();
        for version in by_number.values() {
            if let Some(stages) = stages {
                if !stages.contains(&version.stage) {
                    continue;
                }
            }
            let entry = latest.entry(version.stage).or_insert(version);
            if version.version > entry.version {
                *entry = version;
            }
        }
        let mut out: Vec<ModelVersion> = latest.into_values().cloned().collect();
        out.sort_by_key(|version| version.version);
        Ok(out)
    }

    fn transition_stage(
        &mut self,
        name: &str,
        version: u32,
        stage: ModelStage,
        archive_existing: bool,
    ) -> Result<ModelVersion> {
        let transitioned = {
            let by_number = self
                .versions
                .get_mut(name)
                .ok_or_else(|| RegistryError::VersionNotFound(name.to_string(), version))?;
            if !by_number.contains_key(&version) {
                return Err(RegistryError::VersionNotFound(name.to_string(), version));
            }
            if archive_existing {
                for (number, other) in by_number.iter_mut() {
                    if *number != version && other.stage == stage {
                        other.stage = ModelStage::Archived;
                    }
                }
            }
            let entry = by_number
                .get_mut(&version)
                .ok_or_else(|| RegistryError::VersionNotFound(name.to_string(), version))?;
            entry.stage = stage;
            entry.clone()
        };
        self.touch(name);
        Ok(transitioned)
    }

    fn search_versions(
        &self,
        filter: &VersionFilter,
        max_results: usize,
    ) -> Result<Vec<ModelVersion>> {
        let mut out: Vec<ModelVersion> = self
            .versions
            .values()
            .flat_map(|by_number| by_number.values())
            .filter(|version| filter.matches(version))
            .cloned()
            .collect();
        out.sort_by(|a, b| (a.name.as_str(), a.version).cmp(&(b.name.as_str(), b.version)));
        out.truncate(max_results);
        Ok(out)
    }

    fn get_run(&self, run_id: &str) -> Result<EvaluationRun> {
        self.runs
            .get(run_id)
            .cloned()
            .ok_or_else(|| RegistryError::RunNotFound(run_id.to_string()))
    }

    fn search_runs(&self, query: &RunQuery) -> Result<Vec<EvaluationRun>> {
        let mut runs: Vec<EvaluationRun> = self
            .runs
            .values()
            .filter(|run| query.matches(run))
            .cloned()
            .collect();
        runs.sort_by(|a, b| a.run_id.cmp(&b.run_id));
        Ok(runs)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_version_numbers_strictly_increase(count in 1usize..20) {
            let mut registry = InMemoryRegistry::new();
            registry.create_registered_model("m", None).unwrap();
            let mut last = 0u32;

            for _ in 0..count {
                let version = registry.create_model_version("m", "/artifact", None, None).unwrap();
                prop_assert!(version.version > last);
                last = version.version;
            }
        }

        #[test]
        fn prop_alias_has_single_holder(targets in prop::collection::vec(1u32..=10, 1..20)) {
            let mut registry = InMemoryRegistry::new();
            registry.create_registered_model("m", None).unwrap();
            for i in 0..10 {
                registry.create_model_version("m", &format!("/artifacts/{i}"), None, None).unwrap();
            }

            for target in &targets {
                registry.set_alias("m", "champion", *target).unwrap();
            }

            // However many times the alias moved, it resolves to exactly
            // the last assignment.
            let held = registry.get_version_by_alias("m", "champion").unwrap().unwrap();
            prop_assert_eq!(held.version, *targets.last().unwrap());
        }

        #[test]
        fn prop_alias_never_dangles_after_deletes(
            aliased in 1u32..=5,
            deleted in 1u32..=5,
        ) {
            let mut registry = InMemoryRegistry::new();
            registry.create_registered_model("m", None).unwrap();
            for i in 0..5 {
                registry.create_model_version("m", &format!("/artifacts/{i}"), None, None).unwrap();
            }
            registry.set_alias("m", "champion", aliased).unwrap();
            registry.delete_model_version("m", deleted).unwrap();

            match registry.get_version_by_alias("m", "champion").unwrap() {
                Some(held) => prop_assert!(held.version == aliased && aliased != deleted),
                None => prop_assert_eq!(aliased, deleted),
            }
        }
    }
}
