pub mod health;
pub mod webhook;

use anyhow::{Context, Result};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::trade_levels::Rejection;
use crate::trading::{AlertHandler, AlertOutcome};

pub const BANNER: &str = "TradingView Smart Webhook Server 🚀";

pub struct AppState {
    pub handler: AlertHandler,
}

impl AppState {
    pub fn new(handler: AlertHandler) -> Self {
        Self { handler }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/webhook", post(webhook::receive_alert))
        .route("/health", get(health::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home() -> &'static str {
    BANNER
}

/// Binds `addr` and serves until Ctrl+C.
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelsReply {
    pub entry: f64,
    pub sl: f64,
    pub tp1: f64,
    pub tp2: f64,
    pub rr: f64,
}

/// JSON body returned by `/webhook`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookReply {
    pub status: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<LevelsReply>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WebhookReply {
    fn status(status: &str) -> Self {
        Self {
            status: status.to_string(),
            kind: None,
            levels: None,
            reason: None,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::status("error")
        }
    }

    pub fn from_outcome(outcome: &AlertOutcome) -> (StatusCode, Self) {
        match outcome {
            AlertOutcome::Entry(levels) => (
                StatusCode::OK,
                Self {
                    kind: Some("entry".to_string()),
                    levels: Some(LevelsReply {
                        entry: levels.entry,
                        sl: levels.stop,
                        tp1: levels.target1,
                        tp2: levels.target2,
                        rr: levels.risk_reward,
                    }),
                    ..Self::status("success")
                },
            ),
            // The rejection kind is logged by the handler; callers get one reason.
            AlertOutcome::Rejected(_) => (
                StatusCode::OK,
                Self {
                    reason: Some(Rejection::REPLY_REASON.to_string()),
                    ..Self::status("rejected")
                },
            ),
            AlertOutcome::Management => (
                StatusCode::OK,
                Self {
                    kind: Some("management".to_string()),
                    ..Self::status("success")
                },
            ),
            AlertOutcome::Unknown => (StatusCode::BAD_REQUEST, Self::status("unknown_alert")),
        }
    }
}
