//! Error types for chain access

use thiserror::Error;

/// Chain access errors
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("RPC error: {0}")]
    Rpc(String),

    /// A write failed or reverted; `reason` carries the node's revert message
    #[error("Transaction {action} failed: {reason}")]
    Transaction { action: String, reason: String },

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Writes are disabled: no server wallet configured")]
    WritesDisabled,
}

impl ChainError {
    pub fn rpc(msg: impl ToString) -> Self {
        ChainError::Rpc(msg.to_string())
    }

    pub fn transaction(action: impl Into<String>, reason: impl ToString) -> Self {
        ChainError::Transaction {
            action: action.into(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        ChainError::Decode(msg.into())
    }
}

pub type ChainResult<T> = std::result::Result<T, ChainError>;
