//! Template send handler

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use waflow_common::Error;
use waflow_core::whatsapp::validate_parameters;

use crate::handlers::{error_response, ErrorResponse};
use crate::state::AppState;

/// Request body for sending a template message
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub phone: Option<String>,
    pub template_name: Option<String>,
    #[serde(default)]
    pub parameters: Vec<String>,
    pub campaign_id: Option<String>,
}

/// Response after a provider-accepted send
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub success: bool,
    pub message_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wa_id: Option<String>,
}

/// Resolve, validate, build, and send a template message
///
/// POST /api/v1/whatsapp/send
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(input): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    let phone = match input.phone {
        Some(phone) if !phone.is_empty() => phone,
        _ => return Err(error_response(Error::MissingField("phone".to_string()))),
    };
    let template_name = match input.template_name {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(error_response(Error::MissingField(
                "templateName".to_string(),
            )))
        }
    };

    let template = state
        .whatsapp
        .resolve_template(&template_name)
        .await
        .map_err(error_response)?;

    validate_parameters(&template, &input.parameters).map_err(error_response)?;

    let receipt = state
        .gateway
        .send_template(
            &phone,
            &template,
            &input.parameters,
            input.campaign_id.as_deref(),
        )
        .await
        .map_err(error_response)?;

    info!(
        phone = %phone,
        template = %template_name,
        message_id = %receipt.message_id,
        "Template message sent"
    );

    Ok(Json(SendMessageResponse {
        success: true,
        message_id: receipt.message_id,
        wa_id: receipt.wa_id,
    }))
}
