//! Template inspection handler

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use waflow_core::whatsapp::{parameter_info, ParameterInfo, Template};

use crate::handlers::{error_response, ErrorResponse};
use crate::state::AppState;

/// A resolved template and its placeholder layout
#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub template: Template,
    pub parameters: ParameterInfo,
}

/// Resolve a template and report its parameter requirements
///
/// GET /api/v1/whatsapp/templates/:name
pub async fn get_template(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<TemplateResponse>, (StatusCode, Json<ErrorResponse>)> {
    let template = state
        .whatsapp
        .resolve_template(&name)
        .await
        .map_err(error_response)?;
    let parameters = parameter_info(&template);

    Ok(Json(TemplateResponse {
        template,
        parameters,
    }))
}
