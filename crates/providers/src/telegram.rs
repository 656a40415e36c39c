//! Telegram Bot API notification sink.

use engram_core::{Error, Result};
use reqwest::Client as HttpClient;
use serde_json::json;
use tracing::instrument;

use crate::NotificationSink;

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Fire-and-forget push notifications via a Telegram bot.
pub struct TelegramNotifier {
    client: HttpClient,
    bot_token: String,
    chat_id: String,
    base_url: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self::with_base_url(bot_token, chat_id, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(bot_token: String, chat_id: String, base_url: String) -> Self {
        Self { client: HttpClient::new(), bot_token, chat_id, base_url }
    }
}

#[async_trait::async_trait]
impl NotificationSink for TelegramNotifier {
    #[instrument(skip_all, fields(len = text.len()))]
    async fn send(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "chat_id": self.chat_id, "text": text }))
            .send()
            .await
            .map_err(|e| Error::service(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::service(format!("HTTP error! status: {status}")));
        }
        Ok(())
    }
}
