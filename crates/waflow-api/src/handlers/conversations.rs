//! Conversation handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use waflow_common::types::{ContactStatus, MessageDirection};
use waflow_common::Error;
use waflow_storage::{Conversation, ConversationAnalytics, ConversationFilter};

use crate::handlers::{error_response, ErrorResponse};
use crate::state::AppState;

/// Query parameters for listing conversations
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListConversationsQuery {
    pub campaign_id: Option<String>,
    pub phone: Option<String>,
    pub active: Option<bool>,
}

/// Request body for appending a message
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendMessageRequest {
    pub phone: Option<String>,
    pub campaign_id: Option<String>,
    pub message_id: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub direction: Option<MessageDirection>,
    pub status: Option<ContactStatus>,
}

/// Request body for updating message status or the activity flag
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConversationRequest {
    pub phone: Option<String>,
    pub campaign_id: Option<String>,
    pub message_id: Option<String>,
    pub status: Option<ContactStatus>,
    pub is_active: Option<bool>,
}

/// Query parameters for conversation analytics
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    pub campaign_id: Option<String>,
}

/// List conversations
///
/// GET /api/v1/conversations
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListConversationsQuery>,
) -> Json<Vec<Conversation>> {
    let filter = ConversationFilter {
        campaign_id: query.campaign_id,
        phone: query.phone,
        active: query.active,
    };

    Json(state.conversations.list(&filter).await)
}

/// Append a message to a conversation, creating it if needed
///
/// POST /api/v1/conversations
pub async fn append_message(
    State(state): State<Arc<AppState>>,
    Json(input): Json<AppendMessageRequest>,
) -> Result<Json<Conversation>, (StatusCode, Json<ErrorResponse>)> {
    let phone = require(input.phone, "phone")?;
    let message_id = require(input.message_id, "messageId")?;
    let content = require(input.content, "content")?;
    let direction = input
        .direction
        .ok_or_else(|| error_response(Error::MissingField("type".to_string())))?;

    let conversation = state
        .conversations
        .append_message(
            &phone,
            input.campaign_id.as_deref(),
            &message_id,
            &content,
            direction,
            input.status,
        )
        .await;

    Ok(Json(conversation))
}

/// Update message delivery status and/or the activity flag
///
/// PUT /api/v1/conversations
pub async fn update_conversation(
    State(state): State<Arc<AppState>>,
    Json(input): Json<UpdateConversationRequest>,
) -> Result<Json<Conversation>, (StatusCode, Json<ErrorResponse>)> {
    let phone = require(input.phone, "phone")?;

    let conversation = state
        .conversations
        .set_status(
            &phone,
            input.campaign_id.as_deref(),
            input.message_id.as_deref(),
            input.status,
            input.is_active,
        )
        .await
        .map_err(error_response)?;

    Ok(Json(conversation))
}

/// Conversation analytics, optionally scoped to a campaign
///
/// GET /api/v1/conversations/analytics
pub async fn conversation_analytics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyticsQuery>,
) -> Json<ConversationAnalytics> {
    Json(
        state
            .conversations
            .analytics(query.campaign_id.as_deref())
            .await,
    )
}

fn require(
    value: Option<String>,
    field: &str,
) -> Result<String, (StatusCode, Json<ErrorResponse>)> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(error_response(Error::MissingField(field.to_string()))),
    }
}
