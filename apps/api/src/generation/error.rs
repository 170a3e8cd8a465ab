//! Failure taxonomy for the generation pipelines.
//!
//! Every stage maps its own failure onto exactly one variant; nothing is retried
//! and nothing is replaced with default data.

use thiserror::Error;

use crate::errors::ProviderError;

#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// Empty or blank user input. Raised before any provider is contacted.
    #[error("{0}")]
    Input(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// No JSON could be recovered. `raw` is the untouched provider text.
    #[error("No JSON payload could be recovered from the model response")]
    Extraction { raw: String },

    #[error("{path}: {reason}")]
    Validation { path: String, reason: String },

    /// The model changed the video list it was told to copy.
    #[error("Video materials were altered by the model: {0}")]
    Integrity(String),
}

impl GenerationError {
    /// Short machine-readable kind, used for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Input(_) => "input",
            GenerationError::Provider(_) => "provider",
            GenerationError::Extraction { .. } => "extraction",
            GenerationError::Validation { .. } => "validation",
            GenerationError::Integrity(_) => "integrity",
        }
    }

    /// Error code rendered in HTTP responses.
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::Input(_) => "INPUT_ERROR",
            GenerationError::Provider(_) => "PROVIDER_ERROR",
            GenerationError::Extraction { .. } => "EXTRACTION_ERROR",
            GenerationError::Validation { .. } => "VALIDATION_ERROR",
            GenerationError::Integrity(_) => "INTEGRITY_ERROR",
        }
    }

    pub(crate) fn validation(path: impl Into<String>, reason: impl Into<String>) -> Self {
        GenerationError::Validation {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
