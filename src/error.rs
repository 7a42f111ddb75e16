use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Top-level error type for the entire application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures from the price-feed collaborators (directory lookup + on-chain read)
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Unknown feed symbol: {0}")]
    UnknownSymbol(String),

    #[error("Feed directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("Invalid feed address: {0}")]
    InvalidAddress(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Malformed round data: {0}")]
    MalformedRoundData(String),
}

/// Standard error response format
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Every collaborator failure surfaces as a server error; the handler
        // performs no recovery of its own.
        let (status, error_code, message) = match &self {
            AppError::Feed(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "FEED_ERROR",
                err.to_string(),
            ),
            AppError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                msg.clone(),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: message,
            error_code: error_code.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(error: reqwest::Error) -> Self {
        FeedError::DirectoryUnavailable(format!("HTTP request error: {error}"))
    }
}

impl From<ethers::providers::ProviderError> for FeedError {
    fn from(error: ethers::providers::ProviderError) -> Self {
        FeedError::Rpc(error.to_string())
    }
}

impl From<ethers::abi::Error> for FeedError {
    fn from(error: ethers::abi::Error) -> Self {
        FeedError::MalformedRoundData(error.to_string())
    }
}

/// Result type alias for the application
pub type AppResult<T> = Result<T, AppError>;
