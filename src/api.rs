//! JSON payloads shared by the HTTP server and the upload client.

use serde::{Deserialize, Serialize};

/// Envelope used by every JSON response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Response body.
    pub payload: T,
}

impl<T> ApiResponse<T> {
    /// Wraps a successful payload.
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            payload,
        }
    }
}

/// Error body returned inside a failed [`ApiResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Human-readable reason.
    pub message: String,
}

/// Reply to a CSV upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPayload {
    /// Identifier the file can be fetched under (`GET /csv/{filename}`).
    pub filename: String,
    /// Status message.
    #[serde(default)]
    pub message: String,
}

/// Body of `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Organisation email address.
    pub email: String,
}

/// Reply to a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Display name derived from the address.
    pub name: String,
}
