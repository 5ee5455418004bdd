//! Conversation tracker
//!
//! Message threads keyed by phone and campaign. In-memory only: the
//! conversation history does not survive a process restart.

use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use waflow_common::types::{ContactStatus, MessageDirection};
use waflow_common::{Error, Result};

use crate::models::{Conversation, ConversationAnalytics, ConversationFilter, ConversationMessage};

/// Key used when a message is not tied to any campaign
const DIRECT_CAMPAIGN: &str = "direct";

/// Build the composite conversation key
fn conversation_key(phone: &str, campaign_id: Option<&str>) -> String {
    format!("{}_{}", phone, campaign_id.unwrap_or(DIRECT_CAMPAIGN))
}

/// In-memory conversation collection
#[derive(Default)]
pub struct ConversationStore {
    conversations: RwLock<HashMap<String, Conversation>>,
}

impl ConversationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, lazily creating the conversation for its key
    pub async fn append_message(
        &self,
        phone: &str,
        campaign_id: Option<&str>,
        message_id: &str,
        content: &str,
        direction: MessageDirection,
        status: Option<ContactStatus>,
    ) -> Conversation {
        let key = conversation_key(phone, campaign_id);
        let now = Utc::now();

        let mut conversations = self.conversations.write().await;
        let conversation = conversations.entry(key).or_insert_with(|| Conversation {
            phone: phone.to_string(),
            campaign_id: campaign_id.map(String::from),
            messages: Vec::new(),
            last_activity: now,
            is_active: true,
        });

        conversation.messages.push(ConversationMessage {
            id: message_id.to_string(),
            content: content.to_string(),
            direction,
            timestamp: now,
            status,
        });
        conversation.last_activity = now;
        conversation.is_active = true;

        debug!(
            phone = %phone,
            campaign_id = campaign_id.unwrap_or(DIRECT_CAMPAIGN),
            direction = %direction,
            "Appended conversation message"
        );

        conversation.clone()
    }

    /// Update message delivery status and/or the activity flag.
    ///
    /// An unknown message id is silently ignored; an unknown conversation
    /// key is an error. `last_activity` is refreshed either way.
    pub async fn set_status(
        &self,
        phone: &str,
        campaign_id: Option<&str>,
        message_id: Option<&str>,
        status: Option<ContactStatus>,
        is_active: Option<bool>,
    ) -> Result<Conversation> {
        let key = conversation_key(phone, campaign_id);

        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(&key)
            .ok_or_else(|| Error::NotFound(format!("Conversation {}", key)))?;

        if let (Some(id), Some(status)) = (message_id, status) {
            if let Some(message) = conversation.messages.iter_mut().find(|m| m.id == id) {
                message.status = Some(status);
            }
        }

        if let Some(active) = is_active {
            conversation.is_active = active;
        }

        conversation.last_activity = Utc::now();

        Ok(conversation.clone())
    }

    /// Fetch one conversation by its key parts
    pub async fn get(&self, phone: &str, campaign_id: Option<&str>) -> Option<Conversation> {
        let key = conversation_key(phone, campaign_id);
        self.conversations.read().await.get(&key).cloned()
    }

    /// List conversations matching the filter, newest activity first
    pub async fn list(&self, filter: &ConversationFilter) -> Vec<Conversation> {
        let conversations = self.conversations.read().await;

        let mut matched: Vec<Conversation> = conversations
            .values()
            .filter(|c| {
                if let Some(campaign_id) = &filter.campaign_id {
                    if c.campaign_id.as_deref() != Some(campaign_id.as_str()) {
                        return false;
                    }
                }
                if let Some(phone) = &filter.phone {
                    if &c.phone != phone {
                        return false;
                    }
                }
                if let Some(active) = filter.active {
                    if c.is_active != active {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        matched.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        matched
    }

    /// Aggregate conversation analytics, optionally scoped to a campaign
    pub async fn analytics(&self, campaign_id: Option<&str>) -> ConversationAnalytics {
        let conversations = self.conversations.read().await;

        let scoped: Vec<&Conversation> = conversations
            .values()
            .filter(|c| match campaign_id {
                Some(id) => c.campaign_id.as_deref() == Some(id),
                None => true,
            })
            .collect();

        let total_conversations = scoped.len();
        let active_conversations = scoped.iter().filter(|c| c.is_active).count();
        let total_messages: usize = scoped.iter().map(|c| c.messages.len()).sum();
        let incoming_messages: usize = scoped
            .iter()
            .map(|c| {
                c.messages
                    .iter()
                    .filter(|m| m.direction == MessageDirection::Incoming)
                    .count()
            })
            .sum();
        let outgoing_messages = total_messages - incoming_messages;

        let responded = scoped
            .iter()
            .filter(|c| {
                c.messages
                    .iter()
                    .any(|m| m.direction == MessageDirection::Incoming)
            })
            .count();

        let response_rate = if total_conversations == 0 {
            0
        } else {
            (responded as f64 / total_conversations as f64 * 100.0).round() as u32
        };

        ConversationAnalytics {
            total_conversations,
            active_conversations,
            total_messages,
            incoming_messages,
            outgoing_messages,
            response_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_append_creates_conversation_lazily() {
        let store = ConversationStore::new();

        let conversation = store
            .append_message(
                "919999999999",
                Some("camp-1"),
                "wamid.1",
                "Hello there",
                MessageDirection::Outgoing,
                Some(ContactStatus::Sent),
            )
            .await;

        assert_eq!(conversation.phone, "919999999999");
        assert_eq!(conversation.campaign_id.as_deref(), Some("camp-1"));
        assert_eq!(conversation.messages.len(), 1);
        assert!(conversation.is_active);
    }

    #[tokio::test]
    async fn test_direct_key_when_campaign_absent() {
        let store = ConversationStore::new();
        store
            .append_message(
                "911",
                None,
                "m1",
                "hi",
                MessageDirection::Incoming,
                None,
            )
            .await;

        assert!(store.get("911", None).await.is_some());
        assert!(store.get("911", Some("camp-1")).await.is_none());
    }

    #[tokio::test]
    async fn test_set_status_unknown_key_is_not_found() {
        let store = ConversationStore::new();
        let err = store
            .set_status("911", None, None, None, Some(false))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_set_status_updates_message_and_flag() {
        let store = ConversationStore::new();
        store
            .append_message(
                "911",
                Some("camp-1"),
                "wamid.1",
                "hello",
                MessageDirection::Outgoing,
                Some(ContactStatus::Sent),
            )
            .await;

        let updated = store
            .set_status(
                "911",
                Some("camp-1"),
                Some("wamid.1"),
                Some(ContactStatus::Read),
                Some(false),
            )
            .await
            .unwrap();

        assert_eq!(updated.messages[0].status, Some(ContactStatus::Read));
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn test_set_status_unknown_message_id_is_ignored() {
        let store = ConversationStore::new();
        store
            .append_message(
                "911",
                None,
                "wamid.1",
                "hello",
                MessageDirection::Outgoing,
                Some(ContactStatus::Sent),
            )
            .await;

        let updated = store
            .set_status("911", None, Some("wamid.other"), Some(ContactStatus::Read), None)
            .await
            .unwrap();

        assert_eq!(updated.messages[0].status, Some(ContactStatus::Sent));
    }

    #[tokio::test]
    async fn test_list_filters_are_anded() {
        let store = ConversationStore::new();
        store
            .append_message("911", Some("camp-1"), "m1", "a", MessageDirection::Outgoing, None)
            .await;
        store
            .append_message("922", Some("camp-1"), "m2", "b", MessageDirection::Outgoing, None)
            .await;
        store
            .append_message("911", Some("camp-2"), "m3", "c", MessageDirection::Outgoing, None)
            .await;
        store
            .set_status("922", Some("camp-1"), None, None, Some(false))
            .await
            .unwrap();

        let filter = ConversationFilter {
            campaign_id: Some("camp-1".into()),
            phone: None,
            active: Some(true),
        };
        let listed = store.list(&filter).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].phone, "911");
    }

    #[tokio::test]
    async fn test_list_sorted_by_last_activity_desc() {
        let store = ConversationStore::new();
        store
            .append_message("911", None, "m1", "a", MessageDirection::Outgoing, None)
            .await;
        store
            .append_message("922", None, "m2", "b", MessageDirection::Outgoing, None)
            .await;
        // Touch the first conversation again so it becomes the most recent.
        store
            .append_message("911", None, "m3", "c", MessageDirection::Outgoing, None)
            .await;

        let listed = store.list(&ConversationFilter::default()).await;
        assert_eq!(listed[0].phone, "911");
    }

    #[tokio::test]
    async fn test_analytics_empty_store() {
        let store = ConversationStore::new();
        let analytics = store.analytics(None).await;
        assert_eq!(analytics.total_conversations, 0);
        assert_eq!(analytics.response_rate, 0);
    }

    #[tokio::test]
    async fn test_analytics_response_rate() {
        let store = ConversationStore::new();
        store
            .append_message("911", Some("camp-1"), "m1", "a", MessageDirection::Outgoing, None)
            .await;
        store
            .append_message("911", Some("camp-1"), "m2", "reply", MessageDirection::Incoming, None)
            .await;
        store
            .append_message("922", Some("camp-1"), "m3", "b", MessageDirection::Outgoing, None)
            .await;
        store
            .append_message("933", Some("camp-1"), "m4", "c", MessageDirection::Outgoing, None)
            .await;

        let analytics = store.analytics(Some("camp-1")).await;
        assert_eq!(analytics.total_conversations, 3);
        assert_eq!(analytics.total_messages, 4);
        assert_eq!(analytics.incoming_messages, 1);
        assert_eq!(analytics.outgoing_messages, 3);
        // 1 of 3 conversations has a reply.
        assert_eq!(analytics.response_rate, 33);

        let other = store.analytics(Some("camp-2")).await;
        assert_eq!(other.total_conversations, 0);
        assert_eq!(other.response_rate, 0);
    }
}
