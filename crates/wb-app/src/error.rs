//! Error types for the wb-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives the CLI and the dashboard host one error surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read input file: {path}")]
    InputRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Transform error: {0}")]
    Transform(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Exploration error: {0}")]
    Explore(String),

    #[error("Table error: {0}")]
    Table(String),

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for wb-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<wb_config::ConfigError> for AppError {
    fn from(err: wb_config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<wb_transform::TransformError> for AppError {
    fn from(err: wb_transform::TransformError) -> Self {
        AppError::Transform(err.to_string())
    }
}

impl From<wb_results::ResultsError> for AppError {
    fn from(err: wb_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}

impl From<wb_explore::ExploreError> for AppError {
    fn from(err: wb_explore::ExploreError) -> Self {
        AppError::Explore(err.to_string())
    }
}

impl From<wb_core::CoreError> for AppError {
    fn from(err: wb_core::CoreError) -> Self {
        AppError::Table(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
