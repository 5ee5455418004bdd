//! Delivery gateway
//!
//! Wraps the provider client with the post-send bookkeeping: a successful
//! campaign send is mirrored into the conversation tracker as an outgoing
//! message. That write is best-effort and runs on its own task; it never
//! delays or fails the send itself.

use std::sync::Arc;
use tracing::debug;
use waflow_common::types::{ContactStatus, MessageDirection};
use waflow_common::Result;
use waflow_storage::ConversationStore;

use super::builder::build_payload;
use super::client::WhatsAppClient;
use super::types::{SendReceipt, Template};

/// Send path entry point: build, submit, record
pub struct DeliveryGateway {
    client: Arc<WhatsAppClient>,
    conversations: Arc<ConversationStore>,
}

impl DeliveryGateway {
    /// Create a new gateway
    pub fn new(client: Arc<WhatsAppClient>, conversations: Arc<ConversationStore>) -> Self {
        Self {
            client,
            conversations,
        }
    }

    /// Build and send a template message.
    ///
    /// With a campaign id, the accepted message is also recorded in the
    /// conversation tracker keyed by phone and campaign.
    pub async fn send_template(
        &self,
        to: &str,
        template: &Template,
        parameters: &[String],
        campaign_id: Option<&str>,
    ) -> Result<SendReceipt> {
        let payload = build_payload(to, template, parameters, self.client.default_language())?;
        let receipt = self.client.send_message(&payload).await?;

        if let Some(campaign_id) = campaign_id {
            let conversations = self.conversations.clone();
            let phone = to.to_string();
            let campaign_id = campaign_id.to_string();
            let message_id = receipt.message_id.clone();
            let content = format!("Template: {}", template.name);

            tokio::spawn(async move {
                conversations
                    .append_message(
                        &phone,
                        Some(&campaign_id),
                        &message_id,
                        &content,
                        MessageDirection::Outgoing,
                        Some(ContactStatus::Sent),
                    )
                    .await;
                debug!(
                    phone = %phone,
                    campaign_id = %campaign_id,
                    message_id = %message_id,
                    "Recorded outgoing message"
                );
            });
        }

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whatsapp::types::{ComponentType, TemplateComponent, TemplateStatus};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use waflow_common::config::WhatsAppConfig;
    use waflow_storage::ConversationFilter;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base: &str) -> WhatsAppConfig {
        WhatsAppConfig {
            api_base_url: base.to_string(),
            phone_number_id: "10001".to_string(),
            business_account_id: "20002".to_string(),
            access_token: "test-token".to_string(),
            verify_token: "verify".to_string(),
            app_secret: None,
            default_language: "en_US".to_string(),
            timeout_secs: 5,
        }
    }

    fn template() -> Template {
        Template {
            name: "welcome_msg".into(),
            status: TemplateStatus::Approved,
            category: None,
            language: Some("en_US".into()),
            components: vec![TemplateComponent {
                component_type: ComponentType::Body,
                text: Some("Hello {{1}}".into()),
                format: None,
            }],
        }
    }

    #[tokio::test]
    async fn test_campaign_send_records_conversation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/10001/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "messages": [{"id": "wamid.GW1"}],
                "contacts": [{"wa_id": "919999999999"}]
            })))
            .mount(&server)
            .await;

        let conversations = Arc::new(ConversationStore::new());
        let client = Arc::new(WhatsAppClient::new(&config(&server.uri())));
        let gateway = DeliveryGateway::new(client, conversations.clone());

        let receipt = gateway
            .send_template(
                "919999999999",
                &template(),
                &["Raj".to_string()],
                Some("camp-1"),
            )
            .await
            .unwrap();
        assert_eq!(receipt.message_id, "wamid.GW1");

        // The conversation write runs on its own task; let it settle.
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let conversation = conversations
            .get("919999999999", Some("camp-1"))
            .await
            .expect("conversation recorded");
        assert_eq!(conversation.messages.len(), 1);
        assert_eq!(conversation.messages[0].id, "wamid.GW1");
        assert_eq!(
            conversation.messages[0].direction,
            MessageDirection::Outgoing
        );
    }

    #[tokio::test]
    async fn test_direct_send_skips_conversation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/10001/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "messages": [{"id": "wamid.GW2"}]
            })))
            .mount(&server)
            .await;

        let conversations = Arc::new(ConversationStore::new());
        let client = Arc::new(WhatsAppClient::new(&config(&server.uri())));
        let gateway = DeliveryGateway::new(client, conversations.clone());

        gateway
            .send_template("911", &template(), &["Raj".to_string()], None)
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(conversations
            .list(&ConversationFilter::default())
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_provider_rejection_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/10001/messages"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"error": {"message": "Invalid recipient"}})),
            )
            .mount(&server)
            .await;

        let conversations = Arc::new(ConversationStore::new());
        let client = Arc::new(WhatsAppClient::new(&config(&server.uri())));
        let gateway = DeliveryGateway::new(client, conversations.clone());

        let err = gateway
            .send_template("911", &template(), &["Raj".to_string()], Some("camp-1"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "DELIVERY_FAILED");

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(conversations.get("911", Some("camp-1")).await.is_none());
    }
}
