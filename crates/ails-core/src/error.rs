//! Error types for AILS

use thiserror::Error;

/// Main error type for AILS operations
#[derive(Debug, Error)]
pub enum AilsError {
    /// Invalid or incomplete search configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid problem instance
    #[error("Instance error: {0}")]
    Instance(String),

    /// Invalid operation for the current engine state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type alias for AILS operations
pub type Result<T> = std::result::Result<T, AilsError>;
