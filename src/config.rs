//! Server configuration loaded from the environment.
//!
//! Every variable is read through [`get_env_var`], so values may also come
//! from `$HOME/.gitsheet/settings.json`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use lettre::message::Mailbox;
use url::Url;

use crate::utils::settings::get_env_var;

/// Organisation domain accepted by `/login` unless overridden.
pub const DEFAULT_ORG_DOMAIN: &str = "webpoint.io";

/// Recipient used when an upload names none, unless overridden.
pub const DEFAULT_RECIPIENT: &str = "timesheets@webpoint.io";

/// Directory uploads and local exports are stored in, unless overridden.
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Largest request body `POST /csv` accepts unless overridden (64 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Variables the server refuses to start without.
pub const REQUIRED_VARS: &[&str] = &[
    "SMTP_USERNAME",
    "SMTP_PASSWORD",
    "SMTP_HOST",
    "SMTP_PORT",
    "FRONTEND_HOST",
];

/// SMTP connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    /// Login name, also used as the sender address.
    pub username: String,
    /// Password.
    pub password: String,
    /// Relay host name.
    pub host: String,
    /// Relay port.
    pub port: u16,
}

/// Everything the HTTP server needs at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// SMTP settings for delivery emails.
    pub smtp: SmtpConfig,
    /// Public frontend base URL used to build dashboard links.
    pub frontend_host: Url,
    /// Where uploaded CSVs are stored and served from.
    pub output_dir: PathBuf,
    /// Email domain allowed to log in.
    pub org_domain: String,
    /// Recipient used when an upload does not name one.
    pub default_recipient: Mailbox,
    /// Optional Slack incoming webhook.
    pub slack_webhook_url: Option<String>,
    /// Request body limit for uploads, in bytes.
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Loads configuration from the environment (with settings fallback).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| get_env_var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| lookup(key).is_none())
            .collect();
        if !missing.is_empty() {
            anyhow::bail!("{} must be set", missing.join(", "));
        }
        let required = |key: &str| lookup(key).unwrap_or_default();

        let port = required("SMTP_PORT")
            .trim()
            .parse::<u16>()
            .context("SMTP_PORT must be a port number")?;
        let frontend_host = parse_base_url(&required("FRONTEND_HOST"))
            .context("FRONTEND_HOST must be a URL")?;

        let default_recipient = lookup("GITSHEET_DEFAULT_RECIPIENT")
            .unwrap_or_else(|| DEFAULT_RECIPIENT.to_string())
            .parse::<Mailbox>()
            .context("GITSHEET_DEFAULT_RECIPIENT must be an email address")?;

        let max_upload_bytes = match lookup("GITSHEET_MAX_UPLOAD_BYTES") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .context("GITSHEET_MAX_UPLOAD_BYTES must be a byte count")?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            smtp: SmtpConfig {
                username: required("SMTP_USERNAME"),
                password: required("SMTP_PASSWORD"),
                host: required("SMTP_HOST"),
                port,
            },
            frontend_host,
            output_dir: lookup("GITSHEET_OUTPUT_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR), PathBuf::from),
            org_domain: lookup("GITSHEET_ORG_DOMAIN")
                .unwrap_or_else(|| DEFAULT_ORG_DOMAIN.to_string()),
            default_recipient,
            slack_webhook_url: lookup("SLACK_WEBHOOK_URL").filter(|u| !u.trim().is_empty()),
            max_upload_bytes,
        })
    }

    /// Dashboard link for a stored file id.
    pub fn dashboard_link(&self, file_id: &str) -> String {
        format!(
            "{}/dashboard/{file_id}",
            self.frontend_host.as_str().trim_end_matches('/')
        )
    }
}

/// Parses a base URL such as `https://sheets.example.com`.
pub fn parse_base_url(value: &str) -> Result<Url> {
    let url = Url::parse(value.trim()).with_context(|| format!("Invalid URL: {value}"))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("Not a base URL: {value}");
    }
    Ok(url)
}
