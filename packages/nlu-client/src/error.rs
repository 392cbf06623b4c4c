/// Error types for NLU service calls and the authoring workflow
use nluforge_core::{LabelValidationError, SchemaError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum NluServiceError {
    #[error("Application not found: {0}")]
    AppNotFound(Uuid),

    #[error("Version '{version_id}' not found for application {app_id}")]
    VersionNotFound { app_id: Uuid, version_id: String },

    #[error("Intent not found: {0}")]
    IntentNotFound(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Feature source not found: {0}")]
    FeatureSourceNotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid labeled example: {0}")]
    InvalidExample(#[from] LabelValidationError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Version '{version_id}' has not been trained")]
    NotTrained { version_id: String },

    #[error("Nothing published to slot '{slot}'")]
    NotPublished { slot: String },

    #[error("Training failed for model '{model}': {reason}")]
    TrainingFailed { model: String, reason: String },

    #[error("Training did not finish within {elapsed_ms}ms ({attempts} status checks)")]
    TrainingTimeout { elapsed_ms: u64, attempts: u32 },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl NluServiceError {
    pub fn version_not_found(app_id: Uuid, version_id: impl Into<String>) -> Self {
        Self::VersionNotFound {
            app_id,
            version_id: version_id.into(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn not_trained(version_id: impl Into<String>) -> Self {
        Self::NotTrained {
            version_id: version_id.into(),
        }
    }

    pub fn training_failed(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TrainingFailed {
            model: model.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NluServiceError>;
