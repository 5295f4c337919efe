//! Error types for es-export.

use std::path::PathBuf;

use es_core::{CoreError, EntityClass};
use es_engine::EngineError;
use thiserror::Error;

/// Errors that can occur while exporting attribute values.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV write error on {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("{class} count changed from {expected} to {actual} during the run")]
    TopologyChanged {
        class: EntityClass,
        expected: usize,
        actual: usize,
    },

    #[error("Writer for {path} cannot {what}")]
    InvalidState { path: PathBuf, what: &'static str },
}

/// Alias for `Result<T, ExportError>`.
pub type ExportResult<T> = Result<T, ExportError>;
