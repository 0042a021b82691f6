//! Promotion error types

use thiserror::Error;

use crate::registry::RegistryError;

/// Errors from promotion operations.
///
/// Guard rejections are not errors; they surface as
/// [`PromotionOutcome::Blocked`](super::PromotionOutcome::Blocked). An
/// `Err` here means the attempt could not be carried out at all.
#[derive(Debug, Error)]
pub enum PromotionError {
    /// The request failed structural validation before any remote call
    #[error("invalid promotion request: {0}")]
    InvalidRequest(String),

    /// The backing store failed or a referenced entity was absent
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result type for promotion operations
pub type Result<T> = std::result::Result<T, PromotionError>;
