//! `POST /login`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::{debug, info};

use crate::api::{ApiResponse, LoginRequest, LoginResponse};
use crate::identity::org_display_name;
use crate::server::response::ApiError;
use crate::server::AppState;

/// Accepts organisation addresses and answers with a display name.
///
/// Any other address, and any body that is not a login request, is
/// rejected with 401.
pub async fn login(
    State(state): State<Arc<AppState>>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let Json(request) = request.map_err(|e| {
        debug!(error = %e, "Rejected malformed login body");
        ApiError::Unauthorized("invalid email provided".to_string())
    })?;

    let name = org_display_name(&request.email, &state.config.org_domain)
        .ok_or_else(|| ApiError::Unauthorized("invalid email provided".to_string()))?;

    info!(name = %name, "Login accepted");
    Ok(Json(ApiResponse::ok(LoginResponse { name })))
}
