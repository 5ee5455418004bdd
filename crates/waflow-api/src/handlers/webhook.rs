//! Webhook endpoint handlers

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use waflow_core::webhook::{ProcessingSummary, WebhookStatsSnapshot};

use crate::handlers::{error_response, ErrorResponse};
use crate::state::AppState;

/// Subscription handshake query parameters
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Verification handshake
///
/// GET /webhooks/whatsapp
pub async fn verify_webhook(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VerifyQuery>,
) -> Response {
    let mode = query.mode.as_deref().unwrap_or_default();
    let token = query.verify_token.as_deref().unwrap_or_default();
    let challenge = query.challenge.as_deref().unwrap_or_default();

    match state.webhook.verify_handshake(mode, token, challenge) {
        Some(challenge) => (StatusCode::OK, challenge).into_response(),
        None => StatusCode::FORBIDDEN.into_response(),
    }
}

/// Provider callback intake
///
/// POST /webhooks/whatsapp
pub async fn receive_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ProcessingSummary>, (StatusCode, Json<ErrorResponse>)> {
    let signature = headers
        .get("x-hub-signature-256")
        .and_then(|value| value.to_str().ok());

    state
        .webhook
        .handle(&body, signature)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Webhook processing statistics
///
/// GET /webhooks/whatsapp/stats
pub async fn webhook_stats(State(state): State<Arc<AppState>>) -> Json<WebhookStatsSnapshot> {
    Json(state.webhook.stats_snapshot().await)
}
