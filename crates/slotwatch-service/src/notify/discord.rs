use async_trait::async_trait;
use serde::Serialize;

use super::{DeliveryError, DeliveryResult, Notifier};

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    username: &'a str,
    content: &'a str,
}

/// Posts messages to a Discord webhook.
#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    client: reqwest::Client,
    url: String,
    username: String,
}

impl DiscordWebhook {
    #[must_use]
    pub fn new(url: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            username: username.into(),
        }
    }

    fn payload<'a>(&'a self, text: &'a str) -> WebhookMessage<'a> {
        WebhookMessage {
            username: &self.username,
            content: text,
        }
    }
}

#[async_trait]
impl Notifier for DiscordWebhook {
    fn target(&self) -> &str {
        &self.url
    }

    #[tracing::instrument(skip(self, text), fields(text_len = text.len()))]
    async fn send(&self, text: &str) -> DeliveryResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&self.payload(text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(status = status.as_u16(), "Discord webhook accepted message");
        Ok(())
    }
}
