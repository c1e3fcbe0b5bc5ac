use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use crate::notify::NotificationError;
use crate::server::WebhookReply;

/// Failures that abort an alert. Rendered as HTTP 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("malformed payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("notification failed: {0}")]
    Notification(#[from] NotificationError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Alert processing failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(WebhookReply::error(self.to_string())),
        )
            .into_response()
    }
}
