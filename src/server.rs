//! HTTP API receiving timesheets and forwarding them to reviewers.
//!
//! Routes:
//!
//! - `GET /csv/{id}` returns a stored CSV as an attachment.
//! - `POST /csv?receiver=...` stores an uploaded CSV and emails it in the
//!   background.
//! - `POST /login` checks an organisation address.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::ServerConfig;
use crate::delivery::{Mailer, SlackNotifier, SmtpMailer};

pub mod login;
pub mod response;
pub mod routes;

pub use response::ApiError;

/// Shared state handed to every request.
pub struct AppState {
    /// Startup configuration.
    pub config: ServerConfig,
    /// Email transport.
    pub mailer: Arc<dyn Mailer>,
    /// Optional Slack notifier.
    pub notifier: Option<Arc<SlackNotifier>>,
}

impl AppState {
    /// Builds the production state: SMTP mailer plus Slack when configured.
    pub fn from_config(config: ServerConfig) -> Result<Self> {
        let mailer = SmtpMailer::new(&config.smtp).context("Failed to set up SMTP transport")?;
        let notifier = config
            .slack_webhook_url
            .as_deref()
            .map(SlackNotifier::new)
            .transpose()
            .context("Failed to set up Slack notifier")?
            .map(Arc::new);

        Ok(Self {
            config,
            mailer: Arc::new(mailer),
            notifier,
        })
    }
}

/// Builds the router with permissive CORS.
///
/// Request bodies are capped at `config.max_upload_bytes`; larger uploads
/// are answered with 413.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/csv/{id}", get(routes::download_csv))
        .route("/csv", post(routes::upload_csv))
        .route("/login", post(login::login))
        .layer(body_limit)
        .layer(cors)
        .with_state(state)
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(
        addr = %addr,
        output_dir = %state.config.output_dir.display(),
        "Server listening"
    );

    axum::serve(listener, router(Arc::new(state)))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("Server error")
}
