//! Error responses for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::api::{ApiResponse, ErrorPayload};

/// Request failures, each mapped to one status code.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request is malformed.
    #[error("{0}")]
    BadRequest(String),

    /// The caller is not allowed in.
    #[error("{0}")]
    Unauthorized(String),

    /// The requested file does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request body exceeds the upload limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// The server failed to complete the request.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Status code sent for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse {
            success: false,
            payload: ErrorPayload {
                message: self.to_string(),
            },
        };
        (self.status(), Json(body)).into_response()
    }
}
