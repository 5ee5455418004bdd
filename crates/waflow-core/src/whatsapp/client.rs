//! WhatsApp Cloud API client

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use waflow_common::config::WhatsAppConfig;
use waflow_common::{Error, Result};

use super::types::{MessagePayload, SendReceipt, SendResponse, Template, TemplateListResponse};

/// HTTP client for the provider's template catalog and send endpoint
pub struct WhatsAppClient {
    http_client: Client,
    api_base_url: String,
    phone_number_id: String,
    business_account_id: String,
    access_token: String,
    default_language: String,
}

impl WhatsAppClient {
    /// Create a new client from configuration
    pub fn new(config: &WhatsAppConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            phone_number_id: config.phone_number_id.clone(),
            business_account_id: config.business_account_id.clone(),
            access_token: config.access_token.clone(),
            default_language: config.default_language.clone(),
        }
    }

    /// Language code used when a template carries none
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Resolve a named template from the provider catalog.
    ///
    /// Fails with `NotFound` when the catalog has no matching record and
    /// with `NotApproved` when the record exists but is unusable.
    pub async fn resolve_template(&self, name: &str) -> Result<Template> {
        let url = format!(
            "{}/{}/message_templates",
            self.api_base_url, self.business_account_id
        );

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("name", name),
                ("fields", "name,status,category,language,components"),
            ])
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Template fetch failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "Template fetch returned {}: {}",
                status, body
            )));
        }

        let catalog: TemplateListResponse = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("Invalid template catalog response: {}", e)))?;

        let template = catalog
            .data
            .into_iter()
            .find(|t| t.name == name)
            .ok_or_else(|| Error::NotFound(format!("Template {}", name)))?;

        if template.status != super::types::TemplateStatus::Approved {
            return Err(Error::NotApproved {
                name: template.name,
                status: template.status.to_string(),
            });
        }

        debug!(template = %template.name, "Resolved approved template");

        Ok(template)
    }

    /// Submit a payload to the provider's send endpoint.
    ///
    /// A non-2xx answer surfaces the provider's raw error body; no retry
    /// is attempted here.
    pub async fn send_message(&self, payload: &MessagePayload) -> Result<SendReceipt> {
        let url = format!("{}/{}/messages", self.api_base_url, self.phone_number_id);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Send request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Delivery {
                status: status.as_u16(),
                body,
            });
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("Invalid send response: {}", e)))?;

        let message_id = sent
            .messages
            .first()
            .map(|m| m.id.clone())
            .ok_or_else(|| Error::Provider("Send response carried no message id".to_string()))?;
        let wa_id = sent.contacts.first().map(|c| c.wa_id.clone());

        info!(to = %payload.to, message_id = %message_id, "Message accepted by provider");

        Ok(SendReceipt { message_id, wa_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whatsapp::builder::build_payload;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
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

    #[tokio::test]
    async fn test_resolve_approved_template() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/20002/message_templates"))
            .and(query_param("name", "welcome_msg"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "name": "welcome_msg",
                    "status": "APPROVED",
                    "category": "UTILITY",
                    "language": "en_US",
                    "components": [
                        {"type": "BODY", "text": "Hello {{1}}"}
                    ]
                }]
            })))
            .mount(&server)
            .await;

        let client = WhatsAppClient::new(&config(&server.uri()));
        let template = client.resolve_template("welcome_msg").await.unwrap();
        assert_eq!(template.name, "welcome_msg");
        assert_eq!(template.components.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_missing_template_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/20002/message_templates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let client = WhatsAppClient::new(&config(&server.uri()));
        let err = client.resolve_template("ghost").await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_resolve_pending_template_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/20002/message_templates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "name": "welcome_msg",
                    "status": "PENDING",
                    "components": []
                }]
            })))
            .mount(&server)
            .await;

        let client = WhatsAppClient::new(&config(&server.uri()));
        let err = client.resolve_template("welcome_msg").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Template 'welcome_msg' is not approved (status: PENDING)"
        );
    }

    #[tokio::test]
    async fn test_send_message_extracts_receipt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/10001/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "messages": [{"id": "wamid.XYZ"}],
                "contacts": [{"wa_id": "919999999999", "input": "919999999999"}]
            })))
            .mount(&server)
            .await;

        let client = WhatsAppClient::new(&config(&server.uri()));
        let template = Template {
            name: "welcome_msg".into(),
            status: super::super::types::TemplateStatus::Approved,
            category: None,
            language: Some("en_US".into()),
            components: vec![],
        };
        let payload = build_payload("919999999999", &template, &[], "en_US").unwrap();

        let receipt = client.send_message(&payload).await.unwrap();
        assert_eq!(receipt.message_id, "wamid.XYZ");
        assert_eq!(receipt.wa_id.as_deref(), Some("919999999999"));
    }

    #[tokio::test]
    async fn test_send_failure_carries_provider_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/10001/messages"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"error": {"message": "Unsupported template"}})),
            )
            .mount(&server)
            .await;

        let client = WhatsAppClient::new(&config(&server.uri()));
        let template = Template {
            name: "welcome_msg".into(),
            status: super::super::types::TemplateStatus::Approved,
            category: None,
            language: Some("en_US".into()),
            components: vec![],
        };
        let payload = build_payload("911", &template, &[], "en_US").unwrap();

        let err = client.send_message(&payload).await.unwrap_err();
        match err {
            Error::Delivery { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("Unsupported template"));
            }
            other => panic!("expected delivery failure, got {:?}", other),
        }
        // Normalized to a client-style error at the boundary.
        assert_eq!(
            Error::Delivery {
                status: 500,
                body: String::new()
            }
            .status_code(),
            400
        );
    }
}
