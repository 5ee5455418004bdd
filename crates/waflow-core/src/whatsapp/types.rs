//! Provider wire types
//!
//! Shapes follow the Graph API's message-template catalog and the
//! Cloud API send endpoint.

use serde::{Deserialize, Serialize};

/// Template approval status in the provider catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TemplateStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for TemplateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateStatus::Pending => write!(f, "PENDING"),
            TemplateStatus::Approved => write!(f, "APPROVED"),
            TemplateStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Structural component type within a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComponentType {
    Header,
    Body,
    Footer,
    Buttons,
}

impl ComponentType {
    /// Tag used for this component in an outbound payload
    pub fn payload_tag(&self) -> &'static str {
        match self {
            ComponentType::Header => "header",
            ComponentType::Body => "body",
            ComponentType::Footer => "footer",
            ComponentType::Buttons => "buttons",
        }
    }
}

/// One structural component of a catalog template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateComponent {
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// A message template as returned by the provider catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub status: TemplateStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub components: Vec<TemplateComponent>,
}

/// Catalog query response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateListResponse {
    #[serde(default)]
    pub data: Vec<Template>,
}

/// A single positional parameter value within a payload component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadParameter {
    #[serde(rename = "type")]
    pub parameter_type: String,
    pub text: String,
}

impl PayloadParameter {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            parameter_type: "text".to_string(),
            text: value.into(),
        }
    }
}

/// One component block of an outbound payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadComponent {
    #[serde(rename = "type")]
    pub component_type: String,
    pub parameters: Vec<PayloadParameter>,
}

/// Template language reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageRef {
    pub code: String,
}

/// Template section of an outbound payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadTemplate {
    pub name: String,
    pub language: LanguageRef,
    pub components: Vec<PayloadComponent>,
}

/// Provider-ready message payload. Built fresh per send, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub messaging_product: String,
    pub to: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub template: PayloadTemplate,
}

/// Send endpoint success envelope
#[derive(Debug, Clone, Deserialize)]
pub struct SendResponse {
    #[serde(default)]
    pub messages: Vec<SentMessage>,
    #[serde(default)]
    pub contacts: Vec<SentContact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentContact {
    pub wa_id: String,
}

/// Normalized result of a successful send
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    pub message_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wa_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_catalog_template_deserializes() {
        let json = r#"{
            "name": "welcome_msg",
            "status": "APPROVED",
            "category": "UTILITY",
            "language": "en_US",
            "components": [
                {"type": "BODY", "text": "Hello {{1}}, your application {{2}} is approved"},
                {"type": "FOOTER", "text": "Reply STOP to opt out"}
            ]
        }"#;

        let template: Template = serde_json::from_str(json).unwrap();
        assert_eq!(template.status, TemplateStatus::Approved);
        assert_eq!(template.components[0].component_type, ComponentType::Body);
        assert_eq!(template.components[1].text.as_deref(), Some("Reply STOP to opt out"));
    }

    #[test]
    fn test_payload_serializes_provider_shape() {
        let payload = MessagePayload {
            messaging_product: "whatsapp".into(),
            to: "919999999999".into(),
            message_type: "template".into(),
            template: PayloadTemplate {
                name: "welcome_msg".into(),
                language: LanguageRef {
                    code: "en_US".into(),
                },
                components: vec![PayloadComponent {
                    component_type: "body".into(),
                    parameters: vec![PayloadParameter::text("Raj")],
                }],
            },
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["type"], "template");
        assert_eq!(value["template"]["language"]["code"], "en_US");
        assert_eq!(value["template"]["components"][0]["parameters"][0]["type"], "text");
    }
}
