//! Model version lifecycle stages

use serde::{Deserialize, Serialize};

/// Lifecycle stage of a model version.
///
/// Stages are an organizational adjunct mirrored from the backing
/// store's vocabulary. Alias reassignment, not stage transition, is
/// what moves serving traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelStage {
    /// Not assigned to any stage
    None,
    /// Under validation
    Staging,
    /// Deployed and serving traffic
    Production,
    /// Retired from active use
    Archived,
}

impl ModelStage {
    /// Display name for the stage.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelStage::None => "None",
            ModelStage::Staging => "Staging",
            ModelStage::Production => "Production",
            ModelStage::Archived => "Archived",
        }
    }
}

impl std::fmt::Display for ModelStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
