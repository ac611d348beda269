// ABOUTME: DNS operations trait for hosted zones.
// ABOUTME: List zones and upsert alias records.

use super::sealed::Sealed;
use super::shared_types::{AliasRecord, HostedZone};
use crate::types::ZoneId;
use async_trait::async_trait;

/// Hosted zone and record operations.
#[async_trait]
pub trait DnsOps: Sealed + Send + Sync {
    /// Every hosted zone visible to the account, across all pages.
    async fn list_zones(&self) -> Result<Vec<HostedZone>, DnsError>;

    /// Create or replace an alias record.
    async fn upsert_alias_record(
        &self,
        zone: &ZoneId,
        record: &AliasRecord,
    ) -> Result<(), DnsError>;
}

/// Errors from DNS operations.
#[derive(Debug, thiserror::Error)]
pub enum DnsError {
    #[error("hosted zone not found: {0}")]
    ZoneNotFound(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("provider error: {0}")]
    Provider(String),
}
