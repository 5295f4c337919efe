//! Error types for the es-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the lower crates and
/// provides one error interface for the command line.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Core(#[from] es_core::CoreError),

    #[error("{0}")]
    Engine(#[from] es_engine::EngineError),

    #[error("Export failed: {0}")]
    Export(#[from] es_export::ExportError),

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for es-app operations.
pub type AppResult<T> = Result<T, AppError>;
