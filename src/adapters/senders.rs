use crate::domain::outcome::Outcome;
use crate::domain::ports::Sender;
use async_trait::async_trait;
use reqwest::Client;

/// Prints reports to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSender;

#[async_trait]
impl Sender for StdoutSender {
    async fn send(&self, message: &str) -> Option<String> {
        Outcome::of(message).consume(|text| println!("{}", text))
    }
}

/// Posts reports to a list of Telegram chats through the Bot API.
pub struct TelegramSender {
    client: Client,
    base_url: String,
    api_token: String,
    chat_ids: Vec<String>,
}

impl TelegramSender {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.telegram.org";

    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        chat_ids: Vec<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
            chat_ids,
        }
    }

    async fn send_to(&self, chat_id: &str, text: &str) -> Result<(), String> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.api_token);
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| format!("Sending to chat {} failed: {}", chat_id, e.without_url()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!(
                "Sending to chat {} failed with status {}",
                chat_id,
                response.status().as_u16()
            ))
        }
    }
}

#[async_trait]
impl Sender for TelegramSender {
    async fn send(&self, message: &str) -> Option<String> {
        if self.chat_ids.is_empty() {
            return Some("No chat ids configured".to_string());
        }

        for chat_id in &self.chat_ids {
            if let Err(e) = self.send_to(chat_id, message).await {
                tracing::error!("{}", e);
                return Some(e);
            }
            tracing::debug!("Report delivered to chat {}", chat_id);
        }
        None
    }
}
