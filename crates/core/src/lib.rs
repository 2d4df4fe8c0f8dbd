//! Shared primitives for all Rust crates in Crawlpool.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Result type used across Crawlpool crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
///
/// The facade maps these onto transport status codes; everything below the
/// facade returns them unchanged.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated precondition.
    #[error("invalid parameter: {0}")]
    Validation(String),

    /// Requested resource does not exist, or no account is available for lease.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
