//! Error types for engine operations.

use std::path::PathBuf;

use es_core::{EntityClass, EntityIndex};
use thiserror::Error;

/// Errors surfaced by the hydraulic engine.
///
/// Solver-level failures are opaque here: the toolkit code and its own message
/// are carried through unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Epanet error {code}: {message}")]
    Toolkit { code: i32, message: String },

    #[error("No {class} with index {index}")]
    NoSuchEntity {
        class: EntityClass,
        index: EntityIndex,
    },

    #[error("Path is not valid for the engine: {path}")]
    InvalidPath { path: PathBuf },

    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: i64 },

    #[error("Hydraulic session protocol violated: {what}")]
    Protocol { what: &'static str },
}

pub type EngineResult<T> = Result<T, EngineError>;
