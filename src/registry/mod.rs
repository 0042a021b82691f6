//! Typed client interface over the model registry and tracking store
//!
//! The registry owns named models, their monotonically numbered
//! versions, and reassignable aliases; the tracking side records
//! evaluation runs with metrics. Everything is reached through the
//! [`RegistryClient`] trait so pipelines can swap the remote service
//! for the [`InMemoryRegistry`] test double or the [`JsonFileRegistry`]
//! development backend.
//!
//! # Example
//!
//! ```
//! use promover::registry::{InMemoryRegistry, RegistryClient};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = InMemoryRegistry::new();
//! client.create_registered_model("churn", Some("churn classifier"))?;
//! let version = client.create_model_version("churn", "runs:/abc123/model", Some("abc123"), None)?;
//! client.set_alias("churn", "champion", version.version)?;
//!
//! let held = client.get_version_by_alias("churn", "champion")?;
//! assert_eq!(held.map(|v| v.version), Some(1));
//! # Ok(())
//! # }
//! ```

mod error;
mod json;
mod keys;
mod memory;
mod model;
mod run;
mod stage;
mod traits;

pub use error::{RegistryError, Result};
pub use json::JsonFileRegistry;
pub use keys::{MetricKey, TagKey};
pub use memory::{InMemoryRegistry, RegistrySnapshot};
pub use model::{
    AliasAssignment, ModelInfo, ModelVersion, RegisteredModel, VersionFilter, VersionSummary,
};
pub use run::{EvaluationRun, RunQuery, RunStatus};
pub use stage::ModelStage;
pub use traits::RegistryClient;
