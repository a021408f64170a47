//! Error types for the branch-and-bound engine.

use bnb_lp::LpError;
use thiserror::Error;

/// Errors that can occur while setting up or running a search.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MipError {
    /// Problem validation failed
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    /// Settings validation failed
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Relaxation oracle failed
    #[error("Oracle failed: {0}")]
    OracleError(String),

    /// LP backend rejected the relaxation data
    #[error("LP backend error: {0}")]
    Lp(#[from] LpError),
}

/// Result type for branch-and-bound operations.
pub type MipResult<T> = Result<T, MipError>;
