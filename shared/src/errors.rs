//! Error types for the analytics engine
//!
//! The engine itself is a set of pure functions and degrades gracefully on
//! sparse data, so the only fallible operations are input validation and
//! loading externally supplied data tables.

use thiserror::Error;

/// Engine-level error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid classification table: {0}")]
    InvalidTable(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
