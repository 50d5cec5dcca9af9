use thiserror::Error;

/// Main error type for the prediction service
#[derive(Error, Debug)]
pub enum GigstressError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Model artifact errors
    #[error("Model artifact not found: {0}")]
    ArtifactMissing(String),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Model not loaded")]
    ModelNotLoaded,

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for GigstressError
pub type Result<T> = std::result::Result<T, GigstressError>;
