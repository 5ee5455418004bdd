//! API request handlers

pub mod campaigns;
pub mod conversations;
pub mod health;
pub mod send;
pub mod templates;
pub mod webhook;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use waflow_common::Error;

/// Error envelope returned by every endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Translate a domain error into the transport envelope
pub(crate) fn error_response(err: Error) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: err.code().to_string(),
            details: Some(err.to_string()),
        }),
    )
}
