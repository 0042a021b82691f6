//! Guarded model promotion for MLOps pipelines
//!
//! `promover` wraps a versioned model registry with the state machine
//! that decides whether a freshly trained model version may take over
//! the alias serving production traffic, and that performs the alias
//! reassignment safely.
//!
//! # Architecture
//!
//! - [`registry`]: typed client interface over the registry and
//!   tracking store, with in-memory and JSON-file backends
//! - [`promotion`]: metric resolution and the guarded alias swap
//!
//! # Example
//!
//! ```
//! use promover::promotion::{PromotionController, PromotionRequest};
//! use promover::registry::{EvaluationRun, InMemoryRegistry, RegistryClient, RunStatus};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = InMemoryRegistry::new();
//! client.create_registered_model("churn", Some("churn classifier"))?;
//! client.create_model_version("churn", "runs:/train-1/model", Some("train-1"), None)?;
//! client.insert_run(
//!     EvaluationRun::new("eval-1", RunStatus::Finished)
//!         .evaluating("train-1")
//!         .ended_at(1_700_000_000_000)
//!         .with_metric("f1_score", 0.83),
//! );
//!
//! let mut controller = PromotionController::new(client);
//! let outcome = controller.promote(&PromotionRequest::new("churn"))?;
//! assert!(outcome.is_promoted());
//! # Ok(())
//! # }
//! ```

pub mod promotion;
pub mod registry;
