//! Error types for the route model

use crate::validate::ValidationReport;

/// Errors building a typed document from raw input
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Input text is not JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON parsed but failed structural validation
    #[error("route schema errors ({} total)", .0.len())]
    Schema(ValidationReport),
}

/// User-visible failures of tree mutations
///
/// Move failures are not errors; see [`crate::MoveOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Custom item label was empty or whitespace
    #[error("Enter a label.")]
    EmptyLabel,

    /// The phase custom items are anchored to is not in this route
    #[error("Phase '{0}' not found in this route.")]
    AnchorPhaseMissing(String),
}
