// ABOUTME: In-memory cloud implementing every provider capability.
// ABOUTME: Records each call and supports fault injection; used by the test suite.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use super::aws::website_endpoint;
use super::traits::sealed::Sealed;
use super::traits::{
    AccessPolicy, AliasRecord, CdnError, ConcurrencyToken, DistributionConfig, DistributionOps,
    DistributionStatus, DistributionSummary, DnsError, DnsOps, HostedZone, ObjectStore,
    StoreError, WebsiteConfig,
};
use crate::types::{DistributionId, DomainName, ZoneId};

const DEFAULT_REGION: &str = "us-east-1";

/// Region a viewer certificate must live in to be attached to a distribution.
const CERTIFICATE_REGION: &str = "us-east-1";

/// A provider operation, as recorded by [`MemoryCloud`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListOrigins,
    CreateOrigin,
    EnableWebsiteHosting,
    UnblockPublicAccess,
    SetPublicReadPolicy,
    PutObject,
    DeleteAllObjects,
    DeleteOrigin,
    CreateDistribution,
    GetDistributionConfig,
    UpdateDistributionConfig,
    DistributionStatus,
    DeleteDistribution,
    ListZones,
    UpsertAliasRecord,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One recorded provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub operation: Operation,
    /// Resource the call addressed (origin name, distribution ID, zone ID).
    pub target: String,
}

/// Stored object as seen by tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
}

/// Snapshot of one origin bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginSnapshot {
    pub website: Option<WebsiteConfig>,
    pub public_access_unblocked: bool,
    pub policy: Option<AccessPolicy>,
    pub objects: BTreeMap<String, StoredObject>,
}

/// Snapshot of one distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionSnapshot {
    pub id: DistributionId,
    pub domain_name: String,
    pub config: DistributionConfig,
}

#[derive(Debug)]
struct DistributionEntry {
    domain_name: String,
    config: DistributionConfig,
    version: u64,
    /// Status polls left before the last change reports `Deployed`.
    pending_polls: u32,
}

impl DistributionEntry {
    fn token(&self) -> ConcurrencyToken {
        ConcurrencyToken::new(format!("E{}", self.version))
    }
}

#[derive(Debug, Default)]
struct CloudState {
    origins: BTreeMap<String, OriginSnapshot>,
    distributions: BTreeMap<String, DistributionEntry>,
    zones: Vec<HostedZone>,
    /// Keyed by (zone ID, record name).
    records: BTreeMap<(String, String), AliasRecord>,
    calls: Vec<Call>,
    faults: HashSet<Operation>,
    next_id: u64,
}

impl CloudState {
    /// Record the call and report an injected fault, if any.
    fn enter(&mut self, operation: Operation, target: &str) -> Result<(), String> {
        self.calls.push(Call {
            operation,
            target: target.to_string(),
        });
        if self.faults.contains(&operation) {
            return Err(format!("injected {} failure for {}", operation, target));
        }
        Ok(())
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// An in-memory account with origins, distributions and hosted zones.
///
/// Behaves like the real services where the orchestrator can observe the
/// difference: names are unique, non-empty origins cannot be deleted,
/// distribution changes need the current concurrency token, and a distribution
/// must be disabled and settled before it can be deleted.
#[derive(Debug)]
pub struct MemoryCloud {
    region: String,
    propagation_polls: u32,
    state: Mutex<CloudState>,
}

impl Default for MemoryCloud {
    fn default() -> Self {
        Self::new()
    }
}

impl Sealed for MemoryCloud {}

impl MemoryCloud {
    pub fn new() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            propagation_polls: 0,
            state: Mutex::new(CloudState::default()),
        }
    }

    /// Region used for website endpoints.
    pub fn with_region(mut self, region: &str) -> Self {
        self.region = region.to_string();
        self
    }

    /// Number of `InProgress` answers after each distribution change.
    pub fn with_propagation_polls(mut self, polls: u32) -> Self {
        self.propagation_polls = polls;
        self
    }

    /// Register a hosted zone. Returns its raw provider ID.
    pub fn add_zone(&self, name: &str) -> String {
        let mut state = self.state.lock();
        let id = format!("/hostedzone/Z{:012}", state.next_id());
        let name = if name.ends_with('.') {
            name.to_ascii_lowercase()
        } else {
            format!("{}.", name.to_ascii_lowercase())
        };
        state.zones.push(HostedZone {
            id: id.clone(),
            name,
            private: false,
        });
        id
    }

    /// Create an origin outside of any deployment run.
    pub fn seed_origin(&self, name: &str) {
        self.state
            .lock()
            .origins
            .entry(name.to_string())
            .or_default();
    }

    /// Store an object in a seeded origin.
    pub fn seed_object(&self, origin: &str, key: &str, body: &[u8]) {
        self.state
            .lock()
            .origins
            .entry(origin.to_string())
            .or_default()
            .objects
            .insert(
                key.to_string(),
                StoredObject {
                    body: Bytes::copy_from_slice(body),
                    content_type: "application/octet-stream".to_string(),
                },
            );
    }

    /// Make every later call to `operation` fail with a provider error.
    pub fn fail(&self, operation: Operation) {
        self.state.lock().faults.insert(operation);
    }

    /// Undo [`MemoryCloud::fail`].
    pub fn recover(&self, operation: Operation) {
        self.state.lock().faults.remove(&operation);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// Recorded operations in call order.
    pub fn operations(&self) -> Vec<Operation> {
        self.state
            .lock()
            .calls
            .iter()
            .map(|call| call.operation)
            .collect()
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.operation == operation)
            .count()
    }

    pub fn origin(&self, name: &str) -> Option<OriginSnapshot> {
        self.state.lock().origins.get(name).cloned()
    }

    pub fn origin_names(&self) -> Vec<String> {
        self.state.lock().origins.keys().cloned().collect()
    }

    pub fn distributions(&self) -> Vec<DistributionSnapshot> {
        self.state
            .lock()
            .distributions
            .iter()
            .map(|(id, entry)| DistributionSnapshot {
                id: DistributionId::new(id.clone()),
                domain_name: entry.domain_name.clone(),
                config: entry.config.clone(),
            })
            .collect()
    }

    pub fn records(&self) -> Vec<AliasRecord> {
        self.state.lock().records.values().cloned().collect()
    }
}

fn certificate_region(arn: &str) -> Option<&str> {
    // arn:aws:acm:<region>:<account>:certificate/<id>
    arn.split(':').nth(3).filter(|region| !region.is_empty())
}

// =============================================================================
// ObjectStore
// =============================================================================

#[async_trait]
impl ObjectStore for MemoryCloud {
    async fn list_origins(&self) -> Result<Vec<String>, StoreError> {
        let mut state = self.state.lock();
        state
            .enter(Operation::ListOrigins, "*")
            .map_err(StoreError::Provider)?;
        Ok(state.origins.keys().cloned().collect())
    }

    async fn create_origin(&self, name: &DomainName) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state
            .enter(Operation::CreateOrigin, name.as_str())
            .map_err(StoreError::Provider)?;
        if state.origins.contains_key(name.as_str()) {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }
        state
            .origins
            .insert(name.to_string(), OriginSnapshot::default());
        Ok(())
    }

    async fn enable_website_hosting(
        &self,
        name: &DomainName,
        website: &WebsiteConfig,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state
            .enter(Operation::EnableWebsiteHosting, name.as_str())
            .map_err(StoreError::Provider)?;
        let origin = state
            .origins
            .get_mut(name.as_str())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        origin.website = Some(website.clone());
        Ok(())
    }

    async fn unblock_public_access(&self, name: &DomainName) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state
            .enter(Operation::UnblockPublicAccess, name.as_str())
            .map_err(StoreError::Provider)?;
        let origin = state
            .origins
            .get_mut(name.as_str())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        origin.public_access_unblocked = true;
        Ok(())
    }

    async fn set_public_read_policy(
        &self,
        name: &DomainName,
        policy: &AccessPolicy,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state
            .enter(Operation::SetPublicReadPolicy, name.as_str())
            .map_err(StoreError::Provider)?;
        let origin = state
            .origins
            .get_mut(name.as_str())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        if !origin.public_access_unblocked {
            return Err(StoreError::Rejected(format!(
                "{}: public policies are blocked",
                name
            )));
        }
        origin.policy = Some(policy.clone());
        Ok(())
    }

    async fn put_object(
        &self,
        name: &DomainName,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state
            .enter(Operation::PutObject, name.as_str())
            .map_err(StoreError::Provider)?;
        let origin = state
            .origins
            .get_mut(name.as_str())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        origin.objects.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn delete_all_objects(&self, name: &DomainName) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state
            .enter(Operation::DeleteAllObjects, name.as_str())
            .map_err(StoreError::Provider)?;
        let origin = state
            .origins
            .get_mut(name.as_str())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        origin.objects.clear();
        Ok(())
    }

    async fn delete_origin(&self, name: &DomainName) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state
            .enter(Operation::DeleteOrigin, name.as_str())
            .map_err(StoreError::Provider)?;
        let origin = state
            .origins
            .get(name.as_str())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        if !origin.objects.is_empty() {
            return Err(StoreError::NotEmpty(name.to_string()));
        }
        state.origins.remove(name.as_str());
        Ok(())
    }

    fn website_endpoint(&self, name: &DomainName) -> String {
        website_endpoint(name.as_str(), &self.region)
    }
}

// =============================================================================
// DistributionOps
// =============================================================================

#[async_trait]
impl DistributionOps for MemoryCloud {
    async fn create_distribution(
        &self,
        config: &DistributionConfig,
    ) -> Result<DistributionSummary, CdnError> {
        let alias = config.aliases.first().cloned().unwrap_or_default();
        let mut state = self.state.lock();
        state
            .enter(Operation::CreateDistribution, &alias)
            .map_err(CdnError::Provider)?;

        if certificate_region(&config.certificate.certificate_arn) != Some(CERTIFICATE_REGION) {
            return Err(CdnError::InvalidCertificate(format!(
                "{}: certificate must be issued in {}",
                config.certificate.certificate_arn, CERTIFICATE_REGION
            )));
        }
        if let Some(taken) = config.aliases.iter().find(|alias| {
            state
                .distributions
                .values()
                .any(|entry| entry.config.aliases.contains(*alias))
        }) {
            return Err(CdnError::AliasInUse(taken.clone()));
        }
        if state
            .distributions
            .values()
            .any(|entry| entry.config.caller_reference == config.caller_reference)
        {
            return Err(CdnError::Rejected(format!(
                "caller reference already used: {}",
                config.caller_reference
            )));
        }

        let n = state.next_id();
        let id = format!("E{:013X}", n);
        let domain_name = format!("d{:013x}.cloudfront.net", n);
        state.distributions.insert(
            id.clone(),
            DistributionEntry {
                domain_name: domain_name.clone(),
                config: config.clone(),
                version: 1,
                pending_polls: self.propagation_polls,
            },
        );

        Ok(DistributionSummary {
            id: DistributionId::new(id),
            domain_name,
        })
    }

    async fn get_distribution_config(
        &self,
        id: &DistributionId,
    ) -> Result<(DistributionConfig, ConcurrencyToken), CdnError> {
        let mut state = self.state.lock();
        state
            .enter(Operation::GetDistributionConfig, id.as_str())
            .map_err(CdnError::Provider)?;
        let entry = state
            .distributions
            .get(id.as_str())
            .ok_or_else(|| CdnError::NotFound(id.to_string()))?;
        Ok((entry.config.clone(), entry.token()))
    }

    async fn update_distribution_config(
        &self,
        id: &DistributionId,
        config: &DistributionConfig,
        token: &ConcurrencyToken,
    ) -> Result<ConcurrencyToken, CdnError> {
        let mut state = self.state.lock();
        state
            .enter(Operation::UpdateDistributionConfig, id.as_str())
            .map_err(CdnError::Provider)?;
        let entry = state
            .distributions
            .get_mut(id.as_str())
            .ok_or_else(|| CdnError::NotFound(id.to_string()))?;
        if &entry.token() != token {
            return Err(CdnError::PreconditionFailed(id.to_string()));
        }
        if entry.config.caller_reference != config.caller_reference {
            return Err(CdnError::Rejected(format!(
                "{}: caller reference cannot change",
                id
            )));
        }
        entry.config = config.clone();
        entry.version += 1;
        entry.pending_polls = self.propagation_polls;
        Ok(entry.token())
    }

    async fn distribution_status(
        &self,
        id: &DistributionId,
    ) -> Result<DistributionStatus, CdnError> {
        let mut state = self.state.lock();
        state
            .enter(Operation::DistributionStatus, id.as_str())
            .map_err(CdnError::Provider)?;
        let entry = state
            .distributions
            .get_mut(id.as_str())
            .ok_or_else(|| CdnError::NotFound(id.to_string()))?;
        if entry.pending_polls > 0 {
            entry.pending_polls -= 1;
            Ok(DistributionStatus::InProgress)
        } else {
            Ok(DistributionStatus::Deployed)
        }
    }

    async fn delete_distribution(
        &self,
        id: &DistributionId,
        token: &ConcurrencyToken,
    ) -> Result<(), CdnError> {
        let mut state = self.state.lock();
        state
            .enter(Operation::DeleteDistribution, id.as_str())
            .map_err(CdnError::Provider)?;
        let entry = state
            .distributions
            .get(id.as_str())
            .ok_or_else(|| CdnError::NotFound(id.to_string()))?;
        if &entry.token() != token {
            return Err(CdnError::PreconditionFailed(id.to_string()));
        }
        if entry.config.enabled || entry.pending_polls > 0 {
            return Err(CdnError::NotDisabled(id.to_string()));
        }
        state.distributions.remove(id.as_str());
        Ok(())
    }
}

// =============================================================================
// DnsOps
// =============================================================================

#[async_trait]
impl DnsOps for MemoryCloud {
    async fn list_zones(&self) -> Result<Vec<HostedZone>, DnsError> {
        let mut state = self.state.lock();
        state
            .enter(Operation::ListZones, "*")
            .map_err(DnsError::Provider)?;
        Ok(state.zones.clone())
    }

    async fn upsert_alias_record(
        &self,
        zone: &ZoneId,
        record: &AliasRecord,
    ) -> Result<(), DnsError> {
        let mut state = self.state.lock();
        state
            .enter(Operation::UpsertAliasRecord, zone.as_str())
            .map_err(DnsError::Provider)?;
        let known = state
            .zones
            .iter()
            .any(|z| ZoneId::from_provider(&z.id) == *zone);
        if !known {
            return Err(DnsError::ZoneNotFound(zone.to_string()));
        }
        state.records.insert(
            (zone.to_string(), record.name.clone()),
            record.clone(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificate_region_reads_fourth_arn_field() {
        assert_eq!(
            certificate_region("arn:aws:acm:us-east-1:123456789012:certificate/abc"),
            Some("us-east-1")
        );
        assert_eq!(certificate_region("arn:aws:acm::1:certificate/abc"), None);
        assert_eq!(certificate_region("not-an-arn"), None);
    }

    #[tokio::test]
    async fn injected_fault_is_recorded_and_returned() {
        let cloud = MemoryCloud::new();
        cloud.fail(Operation::ListOrigins);

        let err = cloud.list_origins().await.unwrap_err();

        assert!(matches!(err, StoreError::Provider(_)));
        assert_eq!(cloud.call_count(Operation::ListOrigins), 1);

        cloud.recover(Operation::ListOrigins);
        assert!(cloud.list_origins().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_empty_origin_cannot_be_deleted() {
        let cloud = MemoryCloud::new();
        cloud.seed_object("a.example.com", "index.html", b"<html>");
        let name = DomainName::new("a.example.com").unwrap();

        let err = cloud.delete_origin(&name).await.unwrap_err();
        assert!(matches!(err, StoreError::NotEmpty(_)));

        cloud.delete_all_objects(&name).await.unwrap();
        cloud.delete_origin(&name).await.unwrap();
        assert!(cloud.origin_names().is_empty());
    }

    #[tokio::test]
    async fn zones_are_listed_with_provider_ids() {
        let cloud = MemoryCloud::new();
        let raw = cloud.add_zone("Example.com");

        let zones = cloud.list_zones().await.unwrap();

        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].id, raw);
        assert_eq!(zones[0].name, "example.com.");
        assert!(raw.starts_with("/hostedzone/"));
    }
}
