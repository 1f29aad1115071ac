//! CSV download and upload routes.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::api::{ApiResponse, UploadPayload};
use crate::delivery::{DeliveryJob, Recipients};
use crate::export::naming::{CSV_EXTENSION, STORED_SUFFIX};
use crate::export::repo_name_from_file_name;
use crate::server::response::ApiError;
use crate::server::AppState;

/// Multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

/// Query string of `POST /csv`.
#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    /// Comma or semicolon separated recipient list.
    #[serde(default)]
    pub receiver: Option<String>,
}

/// True when `id` names a file directly inside the output directory.
pub fn is_plain_file_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(['/', '\\']) && !id.contains("..")
}

/// Stem of an uploaded file name with any directory part removed.
pub fn upload_stem(file_name: &str) -> Option<String> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let stem = FsPath::new(base).file_stem()?.to_str()?;
    is_plain_file_id(stem).then(|| stem.to_string())
}

/// `GET /csv/{id}`: streams back a stored CSV.
pub async fn download_csv(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    if !is_plain_file_id(&id) {
        return Err(ApiError::BadRequest("invalid file id".to_string()));
    }

    let file_name = format!("{id}.{CSV_EXTENSION}");
    let path = state.config.output_dir.join(&file_name);
    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Requested CSV is missing");
            return Err(ApiError::NotFound("file not found".to_string()));
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to read CSV");
            return Err(ApiError::Internal("failed to read file".to_string()));
        }
    };

    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
    ];
    Ok((headers, data).into_response())
}

/// `POST /csv?receiver=...`: stores an upload and schedules its delivery.
pub async fn upload_csv(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadPayload>>, ApiError> {
    let recipients = match Recipients::parse_list(query.receiver.as_deref().unwrap_or_default()) {
        Ok(Some(recipients)) => recipients,
        Ok(None) => Recipients::single(state.config.default_recipient.clone()),
        Err(e) => {
            debug!(error = %e, "Rejected receiver list");
            return Err(ApiError::BadRequest("invalid receiver format".to_string()));
        }
    };

    let (original_name, data) = read_file_field(&mut multipart).await?;
    let stem = upload_stem(&original_name)
        .ok_or_else(|| ApiError::BadRequest("invalid file name".to_string()))?;

    let stored_id = format!("{stem}{STORED_SUFFIX}");
    let stored_name = format!("{stored_id}.{CSV_EXTENSION}");
    let dir = &state.config.output_dir;
    let path = dir.join(&stored_name);

    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        error!(dir = %dir.display(), error = %e, "Failed to create output directory");
        ApiError::Internal("failed to store file".to_string())
    })?;
    tokio::fs::write(&path, &data).await.map_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to store upload");
        ApiError::Internal("failed to store file".to_string())
    })?;
    info!(path = %path.display(), bytes = data.len(), "Stored uploaded CSV");

    DeliveryJob {
        repo_name: repo_name_from_file_name(&stored_name),
        link: state.config.dashboard_link(&stored_id),
        file_name: stored_name,
        data,
        recipients,
    }
    .spawn(state.mailer.clone(), state.notifier.clone());

    Ok(Json(ApiResponse::ok(UploadPayload {
        filename: stored_id,
        message: "File uploaded successfully".to_string(),
    })))
}

/// Finds the `file` field and returns its name and contents.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    let malformed = |e: axum::extract::multipart::MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            debug!(error = %e, "Upload exceeds the body limit");
            return ApiError::PayloadTooLarge("file too large".to_string());
        }
        debug!(error = %e, "Malformed multipart body");
        ApiError::BadRequest("malformed upload".to_string())
    };

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::BadRequest("file name missing".to_string()))?;
        let data = field.bytes().await.map_err(malformed)?;
        return Ok((name, data.to_vec()));
    }

    Err(ApiError::BadRequest("no file uploaded".to_string()))
}
