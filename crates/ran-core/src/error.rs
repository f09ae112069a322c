//! Core error type.
//!
//! Each sub-crate defines its own error enum for the preconditions it owns
//! and converts `CoreError` via `From` where it surfaces one.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid time value {0}: must be finite and non-negative")]
    InvalidTime(f64),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ran-core`.
pub type CoreResult<T> = Result<T, CoreError>;
