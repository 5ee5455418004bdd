//! Webhook processor
//!
//! Receives provider callbacks and fans delivery-status transitions and
//! inbound messages out into the campaign store and conversation tracker.
//! Downstream writes are best-effort: individual failures are logged so
//! the provider is never made to retry a whole batch over one bad event.

use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use waflow_common::config::WhatsAppConfig;
use waflow_common::types::{ContactStatus, MessageDirection};
use waflow_common::{Error, Result};
use waflow_storage::{CampaignStore, ConversationFilter, ConversationStore};

use super::stats::{WebhookStats, WebhookStatsSnapshot};
use super::types::{InboundMessage, ProcessingSummary, StatusUpdate, WebhookEvent};

type HmacSha256 = Hmac<Sha256>;

/// Webhook ingestor
pub struct WebhookProcessor {
    campaigns: Arc<CampaignStore>,
    conversations: Arc<ConversationStore>,
    stats: WebhookStats,
    verify_token: String,
    app_secret: Option<String>,
}

impl WebhookProcessor {
    /// Create a new processor
    pub fn new(
        campaigns: Arc<CampaignStore>,
        conversations: Arc<ConversationStore>,
        config: &WhatsAppConfig,
    ) -> Self {
        Self {
            campaigns,
            conversations,
            stats: WebhookStats::new(),
            verify_token: config.verify_token.clone(),
            app_secret: config.app_secret.clone(),
        }
    }

    /// Answer the subscription handshake.
    ///
    /// Returns the challenge to echo when the mode and token match.
    pub fn verify_handshake(&self, mode: &str, token: &str, challenge: &str) -> Option<String> {
        if mode == "subscribe" && token == self.verify_token {
            info!("Webhook verification handshake accepted");
            Some(challenge.to_string())
        } else {
            warn!(mode = %mode, "Webhook verification rejected");
            None
        }
    }

    /// Process one callback body.
    ///
    /// Always answers with a summary for a parseable, authentic body,
    /// even when individual events fail to route.
    pub async fn handle(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<ProcessingSummary> {
        let started = Instant::now();
        self.stats.record_received().await;

        let event: WebhookEvent = match serde_json::from_slice(body) {
            Ok(event) => event,
            Err(e) => {
                let err = Error::InvalidPayload(e.to_string());
                self.stats.record_failure(&err.to_string()).await;
                return Err(err);
            }
        };

        if let Err(err) = self.verify_signature(body, signature) {
            self.stats.record_failure(&err.to_string()).await;
            return Err(err);
        }

        for entry in &event.entry {
            for change in &entry.changes {
                if change.field != "messages" {
                    continue;
                }
                if let Some(statuses) = &change.value.statuses {
                    for status in statuses {
                        self.apply_status(status).await;
                    }
                }
                if let Some(messages) = &change.value.messages {
                    for message in messages {
                        self.apply_inbound(message).await;
                    }
                }
            }
        }

        self.stats.record_processed().await;

        Ok(ProcessingSummary {
            success: true,
            processing_time: started.elapsed().as_millis() as u64,
            stats: self.stats.snapshot().await,
        })
    }

    /// Current statistics
    pub async fn stats_snapshot(&self) -> WebhookStatsSnapshot {
        self.stats.snapshot().await
    }

    /// Verify the HMAC-SHA256 signature over the raw body.
    ///
    /// Skipped entirely when no app secret is configured.
    fn verify_signature(&self, body: &[u8], header: Option<&str>) -> Result<()> {
        let secret = match &self.app_secret {
            Some(secret) => secret,
            None => {
                debug!("No app secret configured; accepting unsigned webhook");
                return Ok(());
            }
        };

        let header = header.ok_or(Error::InvalidSignature)?;
        let signature = header.strip_prefix("sha256=").ok_or(Error::InvalidSignature)?;
        let expected = hex::decode(signature).map_err(|_| Error::InvalidSignature)?;

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| Error::InvalidSignature)?;
        mac.update(body);
        mac.verify_slice(&expected).map_err(|_| Error::InvalidSignature)
    }

    /// Route one delivery-status transition
    async fn apply_status(&self, update: &StatusUpdate) {
        let status = match update.status.parse::<ContactStatus>() {
            Ok(status) => status,
            Err(_) => {
                warn!(status = %update.status, "Ignoring unknown delivery status");
                return;
            }
        };

        let timestamp = update.timestamp.as_deref().and_then(parse_unix_timestamp);
        let error_message = update
            .errors
            .as_ref()
            .and_then(|errors| errors.first())
            .map(|e| e.describe());

        match self.campaigns.find_by_message_id(&update.id).await {
            Some((campaign_id, phone)) => {
                if let Err(e) = self
                    .campaigns
                    .update_contact_status(
                        &campaign_id,
                        &phone,
                        status,
                        Some(&update.id),
                        timestamp,
                        error_message.as_deref(),
                    )
                    .await
                {
                    error!(
                        error = %e,
                        campaign_id = %campaign_id,
                        message_id = %update.id,
                        "Failed to apply delivery status"
                    );
                }

                if let Err(e) = self
                    .conversations
                    .set_status(&phone, Some(&campaign_id), Some(&update.id), Some(status), None)
                    .await
                {
                    debug!(error = %e, phone = %phone, "No conversation for delivery status");
                }
            }
            None => {
                debug!(
                    message_id = %update.id,
                    "Delivery status with no matching campaign contact"
                );
                if let Err(e) = self
                    .conversations
                    .set_status(
                        &update.recipient_id,
                        None,
                        Some(&update.id),
                        Some(status),
                        None,
                    )
                    .await
                {
                    debug!(error = %e, phone = %update.recipient_id, "No direct conversation");
                }
            }
        }
    }

    /// Route one inbound user message
    async fn apply_inbound(&self, message: &InboundMessage) {
        let content = match &message.text {
            Some(text) => text.body.clone(),
            None => format!("[{}]", message.message_type.as_deref().unwrap_or("unknown")),
        };

        // Attach the reply to the phone's most recent conversation thread.
        let campaign_id = self
            .conversations
            .list(&ConversationFilter {
                phone: Some(message.from.clone()),
                ..Default::default()
            })
            .await
            .into_iter()
            .next()
            .and_then(|c| c.campaign_id);

        self.conversations
            .append_message(
                &message.from,
                campaign_id.as_deref(),
                &message.id,
                &content,
                MessageDirection::Incoming,
                None,
            )
            .await;

        if content.contains("http://") || content.contains("https://") {
            match self.campaigns.record_click(&message.from).await {
                Ok(true) => {}
                Ok(false) => {
                    debug!(phone = %message.from, "Click event with no campaign to credit")
                }
                Err(e) => error!(error = %e, phone = %message.from, "Failed to record click"),
            }
        }
    }
}

/// Parse a provider timestamp (unix seconds as a string)
fn parse_unix_timestamp(value: &str) -> Option<DateTime<Utc>> {
    value
        .parse::<i64>()
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}
