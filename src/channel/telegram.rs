//! Telegram Bot API channel: sendMessage out, getUpdates in.

use super::{ChannelError, CommandInbox, InboundMessage, Notifier};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Clone)]
pub struct TelegramChannel {
    client: reqwest::Client,
    base_url: String,
    token: String,
    chat_id: String,
}

impl std::fmt::Debug for TelegramChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token stays out of debug output.
        f.debug_struct("TelegramChannel")
            .field("base_url", &self.base_url)
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramChannel {
    pub fn new(base_url: String, token: String, chat_id: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url,
            token,
            chat_id,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call(
        &self,
        method: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, ChannelError> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(&payload)
            .send()
            .await
            .map_err(|e| ChannelError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ChannelError::Http {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ChannelError::Parse(e.to_string()))
    }
}

#[async_trait]
impl Notifier for TelegramChannel {
    async fn send(&self, text: &str) -> Result<(), ChannelError> {
        debug!("Sending notification ({} chars)", text.len());
        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        });
        self.call("sendMessage", payload).await.map(|_| ())
    }
}

#[async_trait]
impl CommandInbox for TelegramChannel {
    async fn fetch_new(&self, cursor: Option<i64>) -> Result<Vec<InboundMessage>, ChannelError> {
        let mut payload = serde_json::json!({ "timeout": 0 });
        if let Some(last) = cursor {
            payload["offset"] = serde_json::json!(last + 1);
        }

        let body = self.call("getUpdates", payload).await?;
        let updates = body
            .get("result")
            .and_then(|r| r.as_array())
            .ok_or_else(|| ChannelError::Parse("getUpdates: missing result array".to_string()))?;

        let mut messages = Vec::new();
        for update in updates {
            let Some(id) = update.get("update_id").and_then(|v| v.as_i64()) else {
                continue;
            };
            let message = update.get("message");
            let originator = message
                .and_then(|m| m.pointer("/chat/id"))
                .map(|v| v.to_string())
                .unwrap_or_default();
            // Non-text updates still carry their id so the cursor can pass
            // over them.
            let text = message
                .and_then(|m| m.get("text"))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            messages.push(InboundMessage {
                id,
                originator,
                text,
            });
        }
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url() {
        let channel = TelegramChannel::new(
            "https://api.telegram.org".to_string(),
            "123:abc".to_string(),
            "42".to_string(),
        );
        assert_eq!(
            channel.method_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let channel = TelegramChannel::new(
            "https://api.telegram.org".to_string(),
            "secret-token".to_string(),
            "42".to_string(),
        );
        assert!(!format!("{:?}", channel).contains("secret-token"));
    }
}
