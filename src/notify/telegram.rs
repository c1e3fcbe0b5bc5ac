use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::notify::{NotificationError, NotificationResult, Notifier, OutboundMessage};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
    disable_web_page_preview: bool,
}

/// Bot API `sendMessage` client for one chat.
pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    token: String,
    chat_id: String,
    enabled: bool,
}

impl TelegramNotifier {
    pub fn new(cfg: &Config) -> NotificationResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NotificationError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            api_url: cfg.telegram_api_url.clone(),
            token: cfg.telegram_token.clone(),
            chat_id: cfg.telegram_chat_id.clone(),
            enabled: cfg.telegram_enabled,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &OutboundMessage) -> NotificationResult<()> {
        if !self.is_enabled() {
            debug!("Telegram delivery disabled, skipping message");
            return Ok(());
        }

        let body = SendMessageRequest {
            chat_id: &self.chat_id,
            text: &message.text,
            parse_mode: message.parse_mode.map(|p| p.as_str()),
            disable_web_page_preview: true,
        };

        debug!("Sending Telegram message to chat {}", self.chat_id);

        // The request URL carries the bot token; keep it out of errors.
        let resp = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| NotificationError::Network(e.without_url()))?;

        let status = resp.status();
        if status.is_success() {
            info!("Telegram notification sent");
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_default();
            error!("Telegram API error {}: {}", status, body);
            Err(NotificationError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled && !self.token.is_empty() && !self.chat_id.is_empty()
    }

    fn name(&self) -> &str {
        "telegram"
    }
}
