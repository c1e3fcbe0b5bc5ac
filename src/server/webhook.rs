use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::AlertPayload;
use crate::server::{AppState, WebhookReply};

/// POST /webhook
pub async fn receive_alert(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookReply>), AppError> {
    let payload: AlertPayload = serde_json::from_slice(&body)?;
    let outcome = state.handler.handle(&payload).await?;
    let (code, reply) = WebhookReply::from_outcome(&outcome);
    Ok((code, Json(reply)))
}
