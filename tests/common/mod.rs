use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use tv_alert_relay::config::Config;
use tv_alert_relay::notify::{NotificationError, NotificationResult, Notifier, OutboundMessage};
use tv_alert_relay::server::{router, AppState};
use tv_alert_relay::trading::AlertHandler;

/// Captures outbound messages instead of calling Telegram.
#[derive(Default)]
pub struct CapturingNotifier {
    pub sent: Mutex<Vec<OutboundMessage>>,
    pub fail: bool,
}

#[async_trait]
impl Notifier for CapturingNotifier {
    async fn send(&self, message: &OutboundMessage) -> NotificationResult<()> {
        if self.fail {
            return Err(NotificationError::Api {
                status: 401,
                body: "Unauthorized".to_string(),
            });
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "capturing"
    }
}

pub fn test_config() -> Config {
    Config {
        telegram_api_url: "http://127.0.0.1:9".to_string(),
        ..Config::default()
    }
}

pub fn app_with(notifier: Arc<CapturingNotifier>) -> Router {
    let handler = AlertHandler::new(&test_config(), notifier);
    router(Arc::new(AppState::new(handler)))
}

/// Sends a POST /webhook with a raw body and returns status plus parsed JSON.
pub async fn post_webhook(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
