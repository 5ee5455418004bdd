//! Shared application state

use std::sync::Arc;
use waflow_core::webhook::WebhookProcessor;
use waflow_core::whatsapp::{DeliveryGateway, WhatsAppClient};
use waflow_storage::{CampaignStore, ConversationStore};

/// Application state shared across handlers
pub struct AppState {
    pub campaigns: Arc<CampaignStore>,
    pub conversations: Arc<ConversationStore>,
    pub whatsapp: Arc<WhatsAppClient>,
    pub gateway: DeliveryGateway,
    pub webhook: WebhookProcessor,
}

impl AppState {
    /// Wire up the state from its collaborators
    pub fn new(
        campaigns: Arc<CampaignStore>,
        conversations: Arc<ConversationStore>,
        whatsapp: Arc<WhatsAppClient>,
        gateway: DeliveryGateway,
        webhook: WebhookProcessor,
    ) -> Self {
        Self {
            campaigns,
            conversations,
            whatsapp,
            gateway,
            webhook,
        }
    }
}
