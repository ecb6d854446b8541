//! Error taxonomy for the build recipe.

use crate::step::RecipeStep;
use recipe_tools::ToolError;

/// Recipe errors.
///
/// Everything except `StepFailed` is a precondition failure, raised before
/// any collaborator is called.
#[derive(Debug, thiserror::Error)]
pub enum RecipeError {
    #[error("missing required property: {0}")]
    MissingProperty(&'static str),

    #[error("property {property} must be an https:// URL, got {url:?}")]
    InsecureUrl { property: &'static str, url: String },

    #[error("invalid target {target:?}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("invalid properties: {0}")]
    InvalidProperties(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("step {step} failed: {source}")]
    StepFailed {
        step: RecipeStep,
        #[source]
        source: ToolError,
    },
}

impl RecipeError {
    /// Whether the run was rejected before any side effect.
    pub fn is_precondition(&self) -> bool {
        !matches!(self, RecipeError::StepFailed { .. })
    }

    /// The step that raised, for collaborator failures.
    pub fn failed_step(&self) -> Option<RecipeStep> {
        match self {
            RecipeError::StepFailed { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Result type for recipe operations.
pub type Result<T> = std::result::Result<T, RecipeError>;
