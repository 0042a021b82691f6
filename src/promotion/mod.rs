//! Metric resolution and guarded alias promotion
//!
//! The promotion controller decides whether a newly trained model
//! version may replace the version currently serving traffic, and
//! performs the alias reassignment: candidate resolution, optional
//! metric comparison against the current holder, then an idempotent
//! delete-then-create alias swap.
//!
//! # Example
//!
//! ```
//! use promover::promotion::{PromotionController, PromotionRequest};
//! use promover::registry::{InMemoryRegistry, RegistryClient};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = InMemoryRegistry::new();
//! client.create_registered_model("churn", None)?;
//! client.create_model_version("churn", "runs:/abc123/model", Some("abc123"), None)?;
//!
//! let mut controller = PromotionController::new(client);
//! // No current champion: the candidate takes the alias unguarded.
//! let outcome = controller.promote(&PromotionRequest::new("churn"))?;
//! assert!(outcome.is_promoted());
//! # Ok(())
//! # }
//! ```

mod controller;
mod error;
mod outcome;
mod request;
mod resolver;

#[cfg(test)]
mod tests;

pub use controller::{PromotionController, Registration};
pub use error::{PromotionError, Result};
pub use outcome::{AbortReason, BlockReason, MetricImprovement, PromotionOutcome};
pub use request::PromotionRequest;
pub use resolver::resolve_metric;
