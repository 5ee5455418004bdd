//! WhatsApp Business API integration

pub mod builder;
pub mod client;
pub mod gateway;
pub mod template;
pub mod types;

pub use builder::build_payload;
pub use client::WhatsAppClient;
pub use gateway::DeliveryGateway;
pub use template::{count_placeholders, parameter_info, validate_parameters, ParameterInfo};
pub use types::{
    ComponentType, MessagePayload, SendReceipt, Template, TemplateComponent, TemplateStatus,
};
