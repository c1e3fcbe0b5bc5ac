//! Outbound notifications.
//!
//! The relay talks to a single `Notifier` handed in at construction time.
//! `TelegramNotifier` is the production implementation.

pub mod format;
pub mod telegram;

pub use telegram::TelegramNotifier;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseMode {
    #[serde(rename = "HTML")]
    Html,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Html => "HTML",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub text: String,
    pub parse_mode: Option<ParseMode>,
}

impl OutboundMessage {
    /// Sent verbatim.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: None,
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: Some(ParseMode::Html),
        }
    }
}

pub type NotificationResult<T> = Result<T, NotificationError>;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("telegram API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid notifier config: {0}")]
    InvalidConfig(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> NotificationResult<()>;

    fn is_enabled(&self) -> bool;

    fn name(&self) -> &str;
}
