//! Waflow - WhatsApp campaign messaging service entry point

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use waflow_api::AppState;
use waflow_common::config::Config;
use waflow_core::webhook::WebhookProcessor;
use waflow_core::whatsapp::{DeliveryGateway, WhatsAppClient};
use waflow_storage::{CampaignStore, ConversationStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    info!("Starting Waflow...");

    // Load configuration
    let config = Config::load()?;

    // Open the campaign store; the in-memory index is rebuilt from the
    // backing file before any request is served.
    let campaigns = Arc::new(CampaignStore::open(config.storage.campaigns_file()).await?);
    info!("Campaign store ready");

    // Conversation history is in-memory only and starts empty.
    let conversations = Arc::new(ConversationStore::new());

    // Provider client and send path
    let whatsapp = Arc::new(WhatsAppClient::new(&config.whatsapp));
    let gateway = DeliveryGateway::new(whatsapp.clone(), conversations.clone());

    // Webhook ingestor owns the processing statistics
    let webhook = WebhookProcessor::new(campaigns.clone(), conversations.clone(), &config.whatsapp);

    let state = AppState::new(campaigns, conversations, whatsapp, gateway, webhook);

    // Start API server
    let api_handle = {
        let bind_address = config.server.bind_address.clone();
        let api_port = config.api.port;
        tokio::spawn(async move {
            let app = waflow_api::create_router(state);
            let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_address, api_port))
                .await
                .expect("Failed to bind API server");
            info!("Starting API server on port {}", api_port);
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("API server error: {}", e);
            }
        })
    };

    info!("Waflow started successfully");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    api_handle.abort();

    info!("Waflow shutdown complete");

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,waflow=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true))
        .with(filter)
        .init();
}
