//! Webhook processing statistics
//!
//! Process-lifetime counters owned by the webhook processor. Not
//! persisted; they reset on restart. The processor is the only writer,
//! everything else reads snapshots.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct StatsInner {
    received: u64,
    processed: u64,
    failed: u64,
    last_received: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Counter set for the webhook endpoint
#[derive(Debug, Default)]
pub struct WebhookStats {
    inner: RwLock<StatsInner>,
}

/// Read-only view of the counters
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookStatsSnapshot {
    pub received: u64,
    pub processed: u64,
    pub failed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_received: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl WebhookStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an inbound callback, parsed or not
    pub async fn record_received(&self) {
        let mut inner = self.inner.write().await;
        inner.received += 1;
        inner.last_received = Some(Utc::now());
    }

    /// Count a successfully parsed and routed callback
    pub async fn record_processed(&self) {
        self.inner.write().await.processed += 1;
    }

    /// Count a rejected callback and remember why
    pub async fn record_failure(&self, error: &str) {
        let mut inner = self.inner.write().await;
        inner.failed += 1;
        inner.last_error = Some(error.to_string());
    }

    /// Current counter values
    pub async fn snapshot(&self) -> WebhookStatsSnapshot {
        let inner = self.inner.read().await;
        WebhookStatsSnapshot {
            received: inner.received,
            processed: inner.processed,
            failed: inner.failed,
            last_received: inner.last_received,
            last_error: inner.last_error.clone(),
        }
    }
}
