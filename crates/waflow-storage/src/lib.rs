//! Waflow Storage - Campaign and conversation state
//!
//! This crate provides the persisted campaign collection and the
//! in-memory conversation tracker for Waflow.

pub mod campaigns;
pub mod conversations;
pub mod models;

pub use campaigns::CampaignStore;
pub use conversations::ConversationStore;
pub use models::*;
