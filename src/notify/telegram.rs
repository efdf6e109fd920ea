// =============================================================================
// Telegram Bot Client — report delivery
// =============================================================================
//
// POST https://api.telegram.org/bot{token}/sendMessage
//   { "chat_id": "...", "text": "..." }
//
// Plain text only; the report is already laid out for a monospace chat view.
// =============================================================================

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, instrument};

use super::Notifier;

const API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Bot API client bound to one chat.
#[derive(Clone)]
pub struct TelegramClient {
    token: String,
    chat_id: String,
    base_url: String,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let token = token.into().trim().to_string();
        let chat_id = chat_id.into().trim().to_string();
        if token.is_empty() || chat_id.is_empty() {
            anyhow::bail!("Telegram token and chat id are both required");
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build Telegram HTTP client")?;

        Ok(Self {
            token,
            chat_id,
            base_url: API_BASE.to_string(),
            client,
        })
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, self.token)
    }
}

impl Notifier for TelegramClient {
    #[instrument(skip(self, text), fields(chars = text.len()), name = "telegram::send")]
    async fn send(&self, text: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
        };

        let resp = self
            .client
            .post(self.send_message_url())
            .json(&payload)
            .send()
            .await
            .context("POST sendMessage failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Telegram API returned {}: {}", status, body);
        }

        debug!("message delivered");
        Ok(())
    }
}
