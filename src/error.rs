//! Domain-specific error types for wellbeing-assess

use thiserror::Error;

/// Main error type for the assessment pipeline
#[derive(Error, Debug)]
pub enum AssessmentError {
    #[error("Artifact unavailable: {path}: {message}")]
    ArtifactUnavailable { path: String, message: String },

    #[error("Schema mismatch: {message}")]
    SchemaMismatch { message: String },

    #[error("Invalid feature record: {message}")]
    InvalidRecord { message: String },

    #[error("Prediction error: {message}")]
    Prediction { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl AssessmentError {
    /// True when the predictor or label decoder could not be loaded.
    pub fn is_artifact_unavailable(&self) -> bool {
        matches!(self, AssessmentError::ArtifactUnavailable { .. })
    }
}

impl From<anyhow::Error> for AssessmentError {
    fn from(err: anyhow::Error) -> Self {
        AssessmentError::Prediction {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AssessmentError {
    fn from(err: std::io::Error) -> Self {
        AssessmentError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AssessmentError {
    fn from(err: serde_json::Error) -> Self {
        AssessmentError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for AssessmentError {
    fn from(err: toml::de::Error) -> Self {
        AssessmentError::Config {
            message: format!("TOML parsing error: {}", err),
        }
    }
}

/// Result type alias for assessment operations
pub type Result<T> = std::result::Result<T, AssessmentError>;
