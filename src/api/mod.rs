//! Registry access-control API.
//!
//! - `ZoneAccessApi`: the contract the orchestrator drives
//! - `client`: `CzdsClient`, the HTTP implementation of that contract

use std::fmt;

use async_trait::async_trait;

use crate::error::ApiError;

mod client;

pub use client::CzdsClient;

/// Current terms and conditions a request must be made under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terms {
    pub version: String,
    pub content: String,
}

/// Access state of one zone for the authenticated account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessStatus {
    Available,
    Submitted,
    Pending,
    Approved,
    Denied,
    Revoked,
    Expired,
    Canceled,
    Reviewed,
    /// Status text this build does not know about, kept verbatim.
    Other(String),
}

impl AccessStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Available => "available",
            Self::Submitted => "submitted",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
            Self::Revoked => "revoked",
            Self::Expired => "expired",
            Self::Canceled => "canceled",
            Self::Reviewed => "reviewed",
            Self::Other(text) => text,
        }
    }

    /// Whether a new access request may be submitted from this state.
    pub fn is_requestable(&self) -> bool {
        matches!(
            self,
            Self::Available | Self::Canceled | Self::Denied | Self::Expired | Self::Revoked
        )
    }
}

impl From<String> for AccessStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "available" => Self::Available,
            "submitted" => Self::Submitted,
            "pending" => Self::Pending,
            "approved" => Self::Approved,
            "denied" => Self::Denied,
            "revoked" => Self::Revoked,
            "expired" => Self::Expired,
            "canceled" | "cancelled" => Self::Canceled,
            "reviewed" => Self::Reviewed,
            _ => Self::Other(value),
        }
    }
}

impl fmt::Display for AccessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the zone status listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneStatus {
    pub zone: String,
    pub status: AccessStatus,
    /// Status text as the registry sent it; this is what gets printed.
    pub label: String,
}

impl ZoneStatus {
    pub fn new(zone: impl Into<String>, status: AccessStatus) -> Self {
        let label = status.as_str().to_string();
        Self {
            zone: zone.into(),
            status,
            label,
        }
    }

    /// Classify registry status text, keeping the original spelling.
    pub fn from_registry(zone: impl Into<String>, label: String) -> Self {
        Self {
            zone: zone.into(),
            status: AccessStatus::from(label.clone()),
            label,
        }
    }
}

/// Remote operations the request workflows are built from.
///
/// `authenticate` must succeed before any other call. Implementations own
/// their transport, timeout and retry behavior; callers issue one call at a
/// time and treat every error as final.
#[async_trait]
pub trait ZoneAccessApi: Send + Sync {
    async fn authenticate(&mut self) -> Result<(), ApiError>;

    async fn terms(&self) -> Result<Terms, ApiError>;

    /// Every zone known to the account, in registry order.
    async fn zone_status(&self) -> Result<Vec<ZoneStatus>, ApiError>;

    /// Submit one access request covering `zones`.
    async fn request_zones(&self, zones: &[String], reason: &str) -> Result<(), ApiError>;

    /// Request every requestable zone not in `exclusions`; returns the zones
    /// that were actually submitted.
    async fn request_all_except(
        &self,
        reason: &str,
        exclusions: &[String],
    ) -> Result<Vec<String>, ApiError>;

    async fn extend_zone(&self, zone: &str) -> Result<(), ApiError>;

    /// Extend every extensible zone not in `exclusions`; returns the zones
    /// that were actually extended.
    async fn extend_all_except(&self, exclusions: &[String]) -> Result<Vec<String>, ApiError>;

    /// Id of the most recent access request for `zone`.
    async fn outstanding_request_id(&self, zone: &str) -> Result<String, ApiError>;

    async fn cancel_request(&self, request_id: &str, zone: &str) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_known_values_case_insensitively() {
        assert_eq!(AccessStatus::from("Approved".to_string()), AccessStatus::Approved);
        assert_eq!(AccessStatus::from("cancelled".to_string()), AccessStatus::Canceled);
        assert_eq!(AccessStatus::from("pending".to_string()).to_string(), "pending");
    }

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let status = AccessStatus::from("On-Hold".to_string());
        assert_eq!(status, AccessStatus::Other("On-Hold".into()));
        assert_eq!(status.to_string(), "On-Hold");
        assert!(!status.is_requestable());
    }

    #[test]
    fn requestable_states_match_registry_rules() {
        for status in [
            AccessStatus::Available,
            AccessStatus::Canceled,
            AccessStatus::Denied,
            AccessStatus::Expired,
            AccessStatus::Revoked,
        ] {
            assert!(status.is_requestable(), "{status} should be requestable");
        }
        for status in [
            AccessStatus::Approved,
            AccessStatus::Pending,
            AccessStatus::Submitted,
        ] {
            assert!(!status.is_requestable(), "{status} should not be requestable");
        }
    }

    #[test]
    fn registry_rows_keep_their_spelling() {
        let row = ZoneStatus::from_registry("com", "Cancelled".to_string());
        assert_eq!(row.status, AccessStatus::Canceled);
        assert_eq!(row.label, "Cancelled");
        assert!(row.status.is_requestable());

        let row = ZoneStatus::from_registry("net", "APPROVED".to_string());
        assert_eq!(row.status, AccessStatus::Approved);
        assert_eq!(row.label, "APPROVED");
    }
}
