//! Error types for the core computations

use thiserror::Error;

/// Errors produced by the pure core.
///
/// A payout that is not applicable yet is not an error; those functions
/// return `Ok(None)` instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Amount out of range: {0}")]
    Overflow(String),
}

impl CoreError {
    pub fn parse(msg: impl Into<String>) -> Self {
        CoreError::Parse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        CoreError::InvalidConfig(msg.into())
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        CoreError::Overflow(msg.into())
    }
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
