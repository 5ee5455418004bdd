//! Common types for Waflow

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Campaign lifecycle status
///
/// Transitions run forward only: scheduled -> running -> completed,
/// or failed from any earlier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Scheduled,
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CampaignStatus::Scheduled => write!(f, "scheduled"),
            CampaignStatus::Running => write!(f, "running"),
            CampaignStatus::Completed => write!(f, "completed"),
            CampaignStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for CampaignStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(CampaignStatus::Scheduled),
            "running" => Ok(CampaignStatus::Running),
            "completed" => Ok(CampaignStatus::Completed),
            "failed" => Ok(CampaignStatus::Failed),
            other => Err(crate::Error::InvalidPayload(format!(
                "Unknown campaign status: {}",
                other
            ))),
        }
    }
}

/// Per-contact delivery status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    Sent,
    Delivered,
    Read,
    Failed,
    Duplicate,
}

impl std::fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactStatus::Sent => write!(f, "sent"),
            ContactStatus::Delivered => write!(f, "delivered"),
            ContactStatus::Read => write!(f, "read"),
            ContactStatus::Failed => write!(f, "failed"),
            ContactStatus::Duplicate => write!(f, "duplicate"),
        }
    }
}

impl std::str::FromStr for ContactStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(ContactStatus::Sent),
            "delivered" => Ok(ContactStatus::Delivered),
            "read" => Ok(ContactStatus::Read),
            "failed" => Ok(ContactStatus::Failed),
            "duplicate" => Ok(ContactStatus::Duplicate),
            other => Err(crate::Error::InvalidPayload(format!(
                "Unknown contact status: {}",
                other
            ))),
        }
    }
}

/// Direction of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDirection {
    Outgoing,
    Incoming,
}

impl std::fmt::Display for MessageDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageDirection::Outgoing => write!(f, "outgoing"),
            MessageDirection::Incoming => write!(f, "incoming"),
        }
    }
}

/// Timestamp wrapper
pub type Timestamp = DateTime<Utc>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_campaign_status_roundtrip() {
        for s in ["scheduled", "running", "completed", "failed"] {
            let status: CampaignStatus = s.parse().unwrap();
            assert_eq!(status.to_string(), s);
        }
        assert!("all".parse::<CampaignStatus>().is_err());
    }

    #[test]
    fn test_contact_status_parse() {
        assert_eq!(
            "delivered".parse::<ContactStatus>().unwrap(),
            ContactStatus::Delivered
        );
        assert!("bounced".parse::<ContactStatus>().is_err());
    }

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&CampaignStatus::Scheduled).unwrap(),
            "\"scheduled\""
        );
        assert_eq!(
            serde_json::to_string(&MessageDirection::Incoming).unwrap(),
            "\"incoming\""
        );
    }
}
