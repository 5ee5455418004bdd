//! Campaign handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use waflow_common::types::CampaignStatus;
use waflow_common::Error;
use waflow_storage::{
    Campaign, CampaignFilter, CampaignPage, Contact, CreateCampaign, UpdateCampaign,
};

use crate::handlers::{error_response, ErrorResponse};
use crate::state::AppState;

/// Query parameters for listing campaigns
#[derive(Debug, Deserialize)]
pub struct ListCampaignsQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

/// Request body for creating a campaign
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub template_name: Option<String>,
    pub total_contacts: Option<u32>,
    pub estimated_cost: Option<f64>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

/// Request body for patching a campaign
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    pub campaign_id: Option<String>,
    #[serde(flatten)]
    pub patch: UpdateCampaign,
}

/// List campaigns
///
/// GET /api/v1/campaigns
pub async fn list_campaigns(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListCampaignsQuery>,
) -> Json<CampaignPage> {
    // "all" and anything unparsable mean no status filter.
    let status = query.status.and_then(|s| s.parse::<CampaignStatus>().ok());

    let filter = CampaignFilter {
        status,
        search: query.search,
    };

    Json(state.campaigns.list(&filter, query.limit, query.offset).await)
}

/// Create a new campaign
///
/// POST /api/v1/campaigns
pub async fn create_campaign(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<Campaign>), (StatusCode, Json<ErrorResponse>)> {
    let name = match input.name {
        Some(name) if !name.is_empty() => name,
        _ => return Err(error_response(Error::MissingField("name".to_string()))),
    };
    let template_name = match input.template_name {
        Some(template_name) if !template_name.is_empty() => template_name,
        _ => {
            return Err(error_response(Error::MissingField(
                "templateName".to_string(),
            )))
        }
    };
    let total_contacts = match input.total_contacts {
        Some(total_contacts) => total_contacts,
        None => {
            return Err(error_response(Error::MissingField(
                "totalContacts".to_string(),
            )))
        }
    };

    let campaign = state
        .campaigns
        .create(CreateCampaign {
            id: input.id,
            name,
            template_name,
            total_contacts,
            estimated_cost: input.estimated_cost,
            contacts: input.contacts,
        })
        .await
        .map_err(error_response)?;

    info!(campaign_id = %campaign.id, "Created campaign");

    Ok((StatusCode::CREATED, Json(campaign)))
}

/// Patch a campaign's status, metrics, or contact list
///
/// PUT /api/v1/campaigns
pub async fn update_campaign(
    State(state): State<Arc<AppState>>,
    Json(input): Json<UpdateCampaignRequest>,
) -> Result<Json<Campaign>, (StatusCode, Json<ErrorResponse>)> {
    let campaign_id = match input.campaign_id {
        Some(id) if !id.is_empty() => id,
        _ => {
            return Err(error_response(Error::MissingField(
                "campaignId".to_string(),
            )))
        }
    };

    let campaign = state
        .campaigns
        .update(&campaign_id, input.patch)
        .await
        .map_err(error_response)?;

    Ok(Json(campaign))
}

/// Get a campaign by id
///
/// GET /api/v1/campaigns/:campaign_id
pub async fn get_campaign(
    State(state): State<Arc<AppState>>,
    Path(campaign_id): Path<String>,
) -> Result<Json<Campaign>, (StatusCode, Json<ErrorResponse>)> {
    state
        .campaigns
        .get(&campaign_id)
        .await
        .map(Json)
        .ok_or_else(|| error_response(Error::NotFound(format!("Campaign {}", campaign_id))))
}
