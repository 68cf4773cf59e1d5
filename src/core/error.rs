use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The dataset contradicts itself (dangling reference, cyclic chain).
    /// Details are logged server-side; clients get a generic message.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// The dataset document could not be read or parsed at startup
    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::InvalidInput(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::DataIntegrity(ref msg) => {
                tracing::error!("Data integrity error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Data integrity error occurred".to_string(),
                    None,
                )
            }
            AppError::Dataset(ref msg) => {
                tracing::error!("Dataset error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Dataset error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
