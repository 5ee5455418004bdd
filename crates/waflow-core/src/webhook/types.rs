//! Webhook wire types
//!
//! Shapes follow the Business Account callback format: entries carrying
//! changes for the "messages" field, each holding delivery-status
//! transitions and/or inbound user messages.

use serde::{Deserialize, Serialize};

use super::stats::WebhookStatsSnapshot;

/// Top-level callback body
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

/// One business-account entry
#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub changes: Vec<Change>,
}

/// One change within an entry
#[derive(Debug, Clone, Deserialize)]
pub struct Change {
    pub field: String,
    pub value: ChangeValue,
}

/// Payload of a "messages" change
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub statuses: Option<Vec<StatusUpdate>>,
    #[serde(default)]
    pub messages: Option<Vec<InboundMessage>>,
}

/// A delivery-status transition for an outbound message
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    /// Provider message id
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    pub recipient_id: String,
    #[serde(default)]
    pub errors: Option<Vec<StatusError>>,
}

/// Error detail attached to a failed status
#[derive(Debug, Clone, Deserialize)]
pub struct StatusError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusError {
    /// Human-readable description, preferring title over message
    pub fn describe(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| format!("Provider error {}", self.code.unwrap_or_default()))
    }
}

/// An inbound user message
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    pub id: String,
    pub from: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(rename = "type", default)]
    pub message_type: Option<String>,
    #[serde(default)]
    pub text: Option<TextBody>,
}

/// Text body of an inbound message
#[derive(Debug, Clone, Deserialize)]
pub struct TextBody {
    pub body: String,
}

/// Response returned for every successfully parsed callback
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingSummary {
    pub success: bool,
    /// Wall-clock processing time in milliseconds
    pub processing_time: u64,
    pub stats: WebhookStatsSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_payload_deserializes() {
        let json = r#"{
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "123",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "statuses": [{
                            "id": "wamid.XYZ",
                            "recipient_id": "919999999999",
                            "status": "read",
                            "timestamp": "1700000000"
                        }]
                    }
                }]
            }]
        }"#;

        let event: WebhookEvent = serde_json::from_str(json).unwrap();
        let statuses = event.entry[0].changes[0].value.statuses.as_ref().unwrap();
        assert_eq!(statuses[0].id, "wamid.XYZ");
        assert_eq!(statuses[0].status, "read");
    }

    #[test]
    fn test_inbound_message_deserializes() {
        let json = r#"{
            "entry": [{
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messages": [{
                            "id": "m1",
                            "from": "919999999999",
                            "timestamp": "1700000000",
                            "type": "text",
                            "text": {"body": "Check this out https://example.com"}
                        }]
                    }
                }]
            }]
        }"#;

        let event: WebhookEvent = serde_json::from_str(json).unwrap();
        let messages = event.entry[0].changes[0].value.messages.as_ref().unwrap();
        assert_eq!(messages[0].from, "919999999999");
        assert_eq!(
            messages[0].text.as_ref().unwrap().body,
            "Check this out https://example.com"
        );
    }

    #[test]
    fn test_status_error_describe() {
        let err = StatusError {
            code: Some(131047),
            title: Some("Re-engagement message".into()),
            message: None,
        };
        assert_eq!(err.describe(), "Re-engagement message");

        let bare = StatusError {
            code: Some(131047),
            title: None,
            message: None,
        };
        assert_eq!(bare.describe(), "Provider error 131047");
    }
}
