//! Campaign store
//!
//! The campaign collection is held in memory and mirrored to a single
//! JSON file after every mutation. All mutating operations serialize
//! through one async write gate held across the read-modify-write-persist
//! cycle, so at most one writer touches the file at a time. Reads never
//! wait on file I/O.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;
use waflow_common::types::{CampaignStatus, ContactStatus};
use waflow_common::{Error, Result};

use crate::models::{
    Campaign, CampaignFilter, CampaignPage, CreateCampaign, UpdateCampaign, COST_PER_CONTACT,
};

/// File-backed campaign collection
pub struct CampaignStore {
    path: PathBuf,
    campaigns: RwLock<HashMap<String, Campaign>>,
    write_gate: Mutex<()>,
}

impl CampaignStore {
    /// Open the store, rebuilding the in-memory index from the backing file
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("Failed to create data directory: {}", e)))?;
        }

        let campaigns = if path.exists() {
            let data = tokio::fs::read(&path)
                .await
                .map_err(|e| Error::Storage(format!("Failed to read campaign file: {}", e)))?;
            let records: Vec<Campaign> = serde_json::from_slice(&data)
                .map_err(|e| Error::Storage(format!("Failed to parse campaign file: {}", e)))?;
            records.into_iter().map(|c| (c.id.clone(), c)).collect()
        } else {
            HashMap::new()
        };

        info!(
            path = %path.display(),
            campaigns = campaigns.len(),
            "Opened campaign store"
        );

        Ok(Self {
            path,
            campaigns: RwLock::new(campaigns),
            write_gate: Mutex::new(()),
        })
    }

    /// Create a new campaign and persist it immediately
    pub async fn create(&self, input: CreateCampaign) -> Result<Campaign> {
        let _gate = self.write_gate.lock().await;

        let id = input
            .id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let estimated_cost = input
            .estimated_cost
            .unwrap_or(f64::from(input.total_contacts) * COST_PER_CONTACT);

        let campaign = Campaign {
            id: id.clone(),
            name: input.name,
            template_name: input.template_name,
            status: CampaignStatus::Scheduled,
            total_contacts: input.total_contacts,
            sent_count: 0,
            delivered_count: 0,
            read_count: 0,
            failed_count: 0,
            duplicate_count: 0,
            click_count: 0,
            ctr: 0.0,
            estimated_cost,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            contacts: input.contacts,
            processed_events: Default::default(),
        };

        self.campaigns
            .write()
            .await
            .insert(id.clone(), campaign.clone());
        self.persist().await?;

        info!(campaign_id = %id, name = %campaign.name, "Created campaign");

        Ok(campaign)
    }

    /// Get a campaign by id
    pub async fn get(&self, id: &str) -> Option<Campaign> {
        self.campaigns.read().await.get(id).cloned()
    }

    /// List campaigns, filtered and paginated.
    ///
    /// The result is sorted by creation time (newest first) before the
    /// page window is applied.
    pub async fn list(&self, filter: &CampaignFilter, limit: usize, offset: usize) -> CampaignPage {
        let campaigns = self.campaigns.read().await;

        let mut matched: Vec<Campaign> = campaigns
            .values()
            .filter(|c| {
                if let Some(status) = filter.status {
                    if c.status != status {
                        return false;
                    }
                }
                if let Some(search) = &filter.search {
                    let needle = search.to_lowercase();
                    return c.name.to_lowercase().contains(&needle)
                        || c.template_name.to_lowercase().contains(&needle)
                        || c.id.to_lowercase().contains(&needle);
                }
                true
            })
            .cloned()
            .collect();

        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

        let total = matched.len();
        let campaigns = matched.into_iter().skip(offset).take(limit).collect();

        CampaignPage {
            campaigns,
            total,
            has_more: offset + limit < total,
        }
    }

    /// Apply a partial update to a campaign.
    ///
    /// `started_at` and `completed_at` are stamped only on the first
    /// transition into the matching status; repeated patches keep the
    /// original timestamps.
    pub async fn update(&self, id: &str, patch: UpdateCampaign) -> Result<Campaign> {
        let _gate = self.write_gate.lock().await;

        let updated = {
            let mut campaigns = self.campaigns.write().await;
            let campaign = campaigns
                .get_mut(id)
                .ok_or_else(|| Error::NotFound(format!("Campaign {}", id)))?;

            if let Some(status) = patch.status {
                campaign.status = status;
                if status == CampaignStatus::Running && campaign.started_at.is_none() {
                    campaign.started_at = Some(Utc::now());
                }
                if status == CampaignStatus::Completed && campaign.completed_at.is_none() {
                    campaign.completed_at = Some(Utc::now());
                }
            }

            if let Some(metrics) = &patch.metrics {
                campaign.apply_metrics(metrics);
            }

            if let Some(contacts) = patch.contacts {
                // Full replacement, not a merge.
                campaign.contacts = contacts;
            }

            campaign.clone()
        };

        self.persist().await?;

        debug!(campaign_id = %id, status = %updated.status, "Updated campaign");

        Ok(updated)
    }

    /// Apply a delivery-status transition to a contact.
    ///
    /// The contact is located by exact phone match; when the list holds
    /// duplicate phones the first entry wins. Returns false when the
    /// campaign or contact is unknown. A `(message_id, status)` pair that
    /// was already applied is a no-op, so replayed provider callbacks do
    /// not double-count the aggregates.
    pub async fn update_contact_status(
        &self,
        campaign_id: &str,
        phone: &str,
        status: ContactStatus,
        message_id: Option<&str>,
        timestamp: Option<DateTime<Utc>>,
        error_message: Option<&str>,
    ) -> Result<bool> {
        let _gate = self.write_gate.lock().await;

        let applied = {
            let mut campaigns = self.campaigns.write().await;
            let campaign = match campaigns.get_mut(campaign_id) {
                Some(c) => c,
                None => return Ok(false),
            };

            if let Some(id) = message_id {
                let event_key = format!("{}:{}", id, status);
                if campaign.processed_events.contains(&event_key) {
                    debug!(
                        campaign_id = %campaign_id,
                        message_id = %id,
                        status = %status,
                        "Replayed status callback ignored"
                    );
                    return Ok(true);
                }
            }

            let contact = match campaign.contacts.iter_mut().find(|c| c.phone == phone) {
                Some(c) => c,
                None => return Ok(false),
            };

            contact.apply_status(
                status,
                timestamp.unwrap_or_else(Utc::now),
                message_id,
                error_message,
            );
            campaign.bump_counter(status);
            campaign.recompute_ctr();
            if let Some(id) = message_id {
                campaign.processed_events.insert(format!("{}:{}", id, status));
            }
            true
        };

        if applied {
            self.persist().await?;
        }

        Ok(applied)
    }

    /// Locate the campaign and contact phone owning a provider message id
    pub async fn find_by_message_id(&self, message_id: &str) -> Option<(String, String)> {
        let campaigns = self.campaigns.read().await;
        for campaign in campaigns.values() {
            if let Some(contact) = campaign
                .contacts
                .iter()
                .find(|c| c.message_id.as_deref() == Some(message_id))
            {
                return Some((campaign.id.clone(), contact.phone.clone()));
            }
        }
        None
    }

    /// Record a click against the newest campaign holding the phone.
    ///
    /// Returns false when no campaign contains the phone.
    pub async fn record_click(&self, phone: &str) -> Result<bool> {
        let _gate = self.write_gate.lock().await;

        let recorded = {
            let mut campaigns = self.campaigns.write().await;
            let mut candidates: Vec<&mut Campaign> = campaigns
                .values_mut()
                .filter(|c| c.contacts.iter().any(|contact| contact.phone == phone))
                .collect();
            candidates.sort_by(|a, b| b.created_at.cmp(&a.created_at));

            match candidates.into_iter().next() {
                Some(campaign) => {
                    campaign.click_count += 1;
                    campaign.recompute_ctr();
                    true
                }
                None => {
                    warn!(phone = %phone, "Click with no matching campaign contact");
                    false
                }
            }
        };

        if recorded {
            self.persist().await?;
        }

        Ok(recorded)
    }

    /// Number of campaigns currently held
    pub async fn count(&self) -> usize {
        self.campaigns.read().await.len()
    }

    /// Check that the backing directory is reachable
    pub async fn health_check(&self) -> Result<()> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        if parent.exists() {
            Ok(())
        } else {
            Err(Error::Storage(format!(
                "Data directory {} is missing",
                parent.display()
            )))
        }
    }

    /// Rewrite the backing file from the in-memory collection.
    ///
    /// Callers must hold the write gate.
    async fn persist(&self) -> Result<()> {
        let mut records: Vec<Campaign> = self.campaigns.read().await.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

        let data = serde_json::to_vec_pretty(&records)
            .map_err(|e| Error::Storage(format!("Failed to serialize campaigns: {}", e)))?;

        tokio::fs::write(&self.path, data)
            .await
            .map_err(|e| Error::Storage(format!("Failed to write campaign file: {}", e)))?;

        debug!(campaigns = records.len(), "Persisted campaign collection");

        Ok(())
    }
}
