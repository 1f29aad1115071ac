//! Slack incoming-webhook notifications.

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, SheetError};
use crate::export::uploader::REQUEST_TIMEOUT;

#[derive(Serialize)]
struct BlockPayload {
    blocks: Vec<Block>,
}

#[derive(Serialize)]
struct Block {
    #[serde(rename = "type")]
    block_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<TextObject>,
}

#[derive(Serialize)]
struct TextObject {
    #[serde(rename = "type")]
    text_type: &'static str,
    text: String,
}

impl Block {
    fn section(markdown: String) -> Self {
        Self {
            block_type: "section",
            text: Some(TextObject {
                text_type: "mrkdwn",
                text: markdown,
            }),
        }
    }
}

/// Posts "work log sent" notices to a Slack webhook.
pub struct SlackNotifier {
    client: Client,
    webhook_url: String,
}

impl SlackNotifier {
    /// Creates a notifier for `webhook_url`.
    pub fn new(webhook_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SheetError::Delivery(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }

    /// Announces that `file_name` was delivered and can be found at `url`.
    pub async fn notify(&self, file_name: &str, url: &str) -> Result<()> {
        let payload = BlockPayload {
            blocks: vec![
                Block::section("*Notice: Work Log Sent*".to_string()),
                Block::section(format!("FileName: *{file_name}*\nURL: *{url}*")),
            ],
        };
        debug!(file_name, url, "Posting Slack notification");

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SheetError::Delivery(format!("failed to send message to Slack: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SheetError::Delivery(format!(
                "Slack webhook returned HTTP {status}"
            )));
        }

        info!(file_name, "Slack notification sent");
        Ok(())
    }
}
