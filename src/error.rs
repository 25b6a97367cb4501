//! Error types for the batch MT adapter

use thiserror::Error;

/// Errors raised while resolving locales, loading configuration or calling the provider
#[derive(Debug, Error)]
pub enum MtError {
    /// The locale-map resource (or a configuration file) could not be fetched or decoded
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The batched provider call failed
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MtError {
    /// True for errors the adapter recovers from by falling back to unmapped locales
    pub fn is_configuration(&self) -> bool {
        matches!(self, MtError::Configuration(_))
    }
}

/// Result type for MT operations
pub type MtResult<T> = Result<T, MtError>;
