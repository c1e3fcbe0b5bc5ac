use async_trait::async_trait;
use std::sync::Mutex;

use crate::config::Config;
use crate::notify::{NotificationError, NotificationResult, Notifier, OutboundMessage};

/// Notifier that keeps every message in memory, or fails every send.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<OutboundMessage>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &OutboundMessage) -> NotificationResult<()> {
        if self.fail {
            return Err(NotificationError::Api {
                status: 502,
                body: "bad gateway".to_string(),
            });
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// A Config suitable for testing: no Telegram credentials, UTC display.
pub fn default_test_config() -> Config {
    Config {
        telegram_api_url: "http://127.0.0.1:9".to_string(),
        log_level: "ERROR".to_string(),
        ..Config::default()
    }
}
