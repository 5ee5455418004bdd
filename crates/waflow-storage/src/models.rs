//! Storage models
//!
//! Field names serialize camelCase to match the wire contract of the
//! admin API and the persisted campaign file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use waflow_common::types::{CampaignStatus, ContactStatus, MessageDirection};

/// Cost charged per contact when the caller does not supply an estimate
pub const COST_PER_CONTACT: f64 = 0.05;

/// A bulk-send campaign and its per-recipient bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub template_name: String,
    pub status: CampaignStatus,
    pub total_contacts: u32,
    pub sent_count: u32,
    pub delivered_count: u32,
    pub read_count: u32,
    pub failed_count: u32,
    pub duplicate_count: u32,
    pub click_count: u32,
    pub ctr: f64,
    pub estimated_cost: f64,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    /// Provider callbacks already applied, keyed "messageId:status".
    /// Replayed delivery callbacks no-op instead of double-counting.
    #[serde(default, skip_serializing_if = "HashSet::is_empty")]
    pub processed_events: HashSet<String>,
}

impl Campaign {
    /// Recompute the click-through rate from the current counters.
    ///
    /// Left untouched when reads or sends are zero, so a metrics patch
    /// that zeroes reads carries the previous value over.
    pub fn recompute_ctr(&mut self) {
        if self.read_count > 0 && self.sent_count > 0 {
            self.ctr = f64::from(self.click_count) / f64::from(self.read_count) * 100.0;
        }
    }

    /// Shallow-merge a metrics patch over the existing counters
    pub fn apply_metrics(&mut self, metrics: &CampaignMetrics) {
        if let Some(v) = metrics.total_contacts {
            self.total_contacts = v;
        }
        if let Some(v) = metrics.sent_count {
            self.sent_count = v;
        }
        if let Some(v) = metrics.delivered_count {
            self.delivered_count = v;
        }
        if let Some(v) = metrics.read_count {
            self.read_count = v;
        }
        if let Some(v) = metrics.failed_count {
            self.failed_count = v;
        }
        if let Some(v) = metrics.duplicate_count {
            self.duplicate_count = v;
        }
        if let Some(v) = metrics.click_count {
            self.click_count = v;
        }
        if let Some(v) = metrics.estimated_cost {
            self.estimated_cost = v;
        }
        self.recompute_ctr();
    }

    /// Bump the aggregate counter matching a contact status transition
    pub fn bump_counter(&mut self, status: ContactStatus) {
        match status {
            ContactStatus::Sent => self.sent_count += 1,
            ContactStatus::Delivered => self.delivered_count += 1,
            ContactStatus::Read => self.read_count += 1,
            ContactStatus::Failed => self.failed_count += 1,
            ContactStatus::Duplicate => self.duplicate_count += 1,
        }
    }
}

/// A single recipient within a campaign
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_contact_status")]
    pub status: ContactStatus,
    /// Provider message id; join key for delivery-status callbacks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<u32>,
}

fn default_contact_status() -> ContactStatus {
    ContactStatus::Sent
}

impl Contact {
    /// Apply a status transition, stamping the matching timestamp
    pub fn apply_status(
        &mut self,
        status: ContactStatus,
        timestamp: DateTime<Utc>,
        message_id: Option<&str>,
        error_message: Option<&str>,
    ) {
        self.status = status;
        match status {
            ContactStatus::Sent => self.sent_at = Some(timestamp),
            ContactStatus::Delivered => self.delivered_at = Some(timestamp),
            ContactStatus::Read => self.read_at = Some(timestamp),
            ContactStatus::Failed => self.failed_at = Some(timestamp),
            ContactStatus::Duplicate => {}
        }
        if let Some(id) = message_id {
            self.message_id = Some(id.to_string());
        }
        if let Some(msg) = error_message {
            self.error_message = Some(msg.to_string());
        }
    }
}

/// Input for creating a campaign
#[derive(Debug, Clone)]
pub struct CreateCampaign {
    pub id: Option<String>,
    pub name: String,
    pub template_name: String,
    pub total_contacts: u32,
    pub estimated_cost: Option<f64>,
    pub contacts: Vec<Contact>,
}

/// Partial campaign update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaign {
    pub status: Option<CampaignStatus>,
    pub metrics: Option<CampaignMetrics>,
    /// Full replacement of the stored contact list, not a merge
    pub contacts: Option<Vec<Contact>>,
}

/// Counter patch; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignMetrics {
    pub total_contacts: Option<u32>,
    pub sent_count: Option<u32>,
    pub delivered_count: Option<u32>,
    pub read_count: Option<u32>,
    pub failed_count: Option<u32>,
    pub duplicate_count: Option<u32>,
    pub click_count: Option<u32>,
    pub estimated_cost: Option<f64>,
}

/// Campaign list filter
#[derive(Debug, Clone, Default)]
pub struct CampaignFilter {
    /// Exact status match; None means no filter
    pub status: Option<CampaignStatus>,
    /// Case-insensitive substring over name, template name, and id
    pub search: Option<String>,
}

/// One page of campaigns
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPage {
    pub campaigns: Vec<Campaign>,
    pub total: usize,
    pub has_more: bool,
}

/// A message thread for one phone within one campaign (or direct)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    pub messages: Vec<ConversationMessage>,
    pub last_activity: DateTime<Utc>,
    pub is_active: bool,
}

/// One message within a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    /// Provider message id
    pub id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub direction: MessageDirection,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ContactStatus>,
}

/// Conversation list filter; given fields are AND-combined
#[derive(Debug, Clone, Default)]
pub struct ConversationFilter {
    pub campaign_id: Option<String>,
    pub phone: Option<String>,
    pub active: Option<bool>,
}

/// Aggregates over the tracked conversations
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationAnalytics {
    pub total_conversations: usize,
    pub active_conversations: usize,
    pub total_messages: usize,
    pub incoming_messages: usize,
    pub outgoing_messages: usize,
    /// Percentage of conversations with at least one incoming message,
    /// rounded to the nearest integer
    pub response_rate: u32,
}
