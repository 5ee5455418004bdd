//! API routes

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{campaigns, conversations, health, send, templates, webhook};
use crate::openapi::create_openapi_routes;
use crate::state::AppState;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    // Health check routes
    let health_routes = Router::new()
        .route("/", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .route("/detailed", get(health::health_detailed))
        .with_state(state.clone());

    // Campaign routes
    let campaign_routes = Router::new()
        .route("/", get(campaigns::list_campaigns))
        .route("/", post(campaigns::create_campaign))
        .route("/", put(campaigns::update_campaign))
        .route("/:campaign_id", get(campaigns::get_campaign));

    // Conversation routes
    let conversation_routes = Router::new()
        .route("/", get(conversations::list_conversations))
        .route("/", post(conversations::append_message))
        .route("/", put(conversations::update_conversation))
        .route("/analytics", get(conversations::conversation_analytics));

    // WhatsApp send path routes
    let whatsapp_routes = Router::new()
        .route("/send", post(send::send_message))
        .route("/templates/:name", get(templates::get_template));

    // Provider webhook routes
    let webhook_routes = Router::new()
        .route("/whatsapp", get(webhook::verify_webhook))
        .route("/whatsapp", post(webhook::receive_webhook))
        .route("/whatsapp/stats", get(webhook::webhook_stats))
        .with_state(state.clone());

    // API v1 routes
    let api_v1 = Router::new()
        .nest("/campaigns", campaign_routes)
        .nest("/conversations", conversation_routes)
        .nest("/whatsapp", whatsapp_routes)
        .with_state(state.clone());

    // OpenAPI documentation routes
    let openapi_routes = create_openapi_routes();

    // Combine all routes
    Router::new()
        .nest("/health", health_routes)
        .nest("/api/v1", api_v1)
        .nest("/webhooks", webhook_routes)
        .merge(openapi_routes)
        .layer(TraceLayer::new_for_http())
}
