//! API error type and its HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use noloss_chain::ChainError;
use noloss_core::CoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Pool {0} not found")]
    PoolNotFound(u64),

    /// The pool exists but is in the wrong state for the action
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PoolNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Chain(e) => match e {
                ChainError::Rpc(_) | ChainError::Decode(_) => StatusCode::BAD_GATEWAY,
                ChainError::Transaction { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ChainError::WritesDisabled => StatusCode::SERVICE_UNAVAILABLE,
                ChainError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
                ChainError::Wallet(_) | ChainError::Config(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Core(e) => core_status(e),
        }
    }
}

fn core_status(error: &CoreError) -> StatusCode {
    match error {
        CoreError::Parse(_) => StatusCode::BAD_REQUEST,
        CoreError::InvalidConfig(_) | CoreError::Overflow(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
