//! Multipart upload of a CSV to a remote backend.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::api::{ApiResponse, UploadPayload};
use crate::error::{Result, SheetError};

/// Timeout applied to each upload request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the backend's `POST /csv` endpoint.
pub struct CsvUploader {
    client: Client,
    base_url: String,
}

impl CsvUploader {
    /// Creates an uploader for the backend at `base_url`.
    pub fn new(base_url: &Url) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SheetError::Upload(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Endpoint the file is posted to.
    pub fn upload_url(&self) -> String {
        format!("{}/csv", self.base_url)
    }

    /// Link under which an uploaded file can be retrieved.
    pub fn download_url(&self, filename: &str) -> String {
        format!("{}/csv/{filename}", self.base_url)
    }

    /// Uploads `data` as the form file `file` and returns the filename the
    /// backend stored it under.
    pub async fn upload(&self, file_name: &str, data: Vec<u8>) -> Result<String> {
        let url = self.upload_url();
        debug!(url = %url, file_name, bytes = data.len(), "Uploading CSV");

        let part = Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str("text/csv")
            .map_err(|e| SheetError::Upload(format!("failed to create form file: {e}")))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SheetError::Upload(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetError::Upload(format!("HTTP {status}: {body}")));
        }

        let reply: ApiResponse<UploadPayload> = response
            .json()
            .await
            .map_err(|e| SheetError::Upload(format!("invalid response: {e}")))?;
        if !reply.success {
            return Err(SheetError::Upload(format!(
                "backend rejected upload: {}",
                reply.payload.message
            )));
        }

        info!(filename = %reply.payload.filename, "CSV uploaded");
        Ok(reply.payload.filename)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn uploader_for(server: &MockServer) -> CsvUploader {
        let base = Url::parse(&format!("{}/", server.uri())).unwrap();
        CsvUploader::new(&base).unwrap()
    }

    #[tokio::test]
    async fn returns_echoed_filename() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/csv"))
            .and(header_regex("content-type", "^multipart/form-data; boundary="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "payload": { "filename": "1700000000_repo_1234_final", "message": "ok" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let uploader = uploader_for(&server).await;
        let filename = uploader
            .upload("1700000000_repo_1234.csv", b"Date\n".to_vec())
            .await
            .unwrap();

        assert_eq!(filename, "1700000000_repo_1234_final");
        assert_eq!(
            uploader.download_url(&filename),
            format!("{}/csv/1700000000_repo_1234_final", server.uri())
        );
    }

    #[tokio::test]
    async fn non_success_status_is_upload_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/csv"))
            .respond_with(ResponseTemplate::new(500).set_body_string("disk full"))
            .mount(&server)
            .await;

        let err = uploader_for(&server)
            .await
            .upload("x.csv", Vec::new())
            .await
            .unwrap_err();
        match err {
            SheetError::Upload(msg) => assert!(msg.contains("disk full"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_reply_is_upload_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = uploader_for(&server)
            .await
            .upload("x.csv", Vec::new())
            .await;
        assert!(matches!(result, Err(SheetError::Upload(_))));
    }
}
