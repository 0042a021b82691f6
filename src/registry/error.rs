//! Registry error types

use thiserror::Error;

/// Errors from registry client operations.
///
/// Absence of an entity the caller is expected to recover from (model
/// probes, alias lookups) is expressed as `Ok(None)` on the relevant
/// operations rather than an error; the not-found variants here cover
/// lookups where absence is genuinely exceptional. `Transport` wraps
/// failures of the backing store and is surfaced unchanged; this crate
/// performs no retry or backoff.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("version not found: {0} v{1}")]
    VersionNotFound(String, u32),

    #[error("run not found: {0}")]
    RunNotFound(String),

    #[error("model already exists: {0}")]
    ModelAlreadyExists(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
