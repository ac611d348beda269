// ABOUTME: DNS provisioning: hosted zone lookup and alias record upsert.
// ABOUTME: The alias points the site host at the distribution's domain name.

use crate::deploy::{DeployError, DnsResultExt};
use crate::provider::{AliasRecord, DnsOps};
use crate::types::{DomainName, SiteName, ZoneId};

/// Hosted zone that owns every CloudFront distribution domain.
pub const CLOUDFRONT_HOSTED_ZONE_ID: &str = "Z2FDTNDATAQYW2";

/// Alias record for `<site>.<domain>.` pointing at `<target>.`.
pub fn alias_record(site: &SiteName, domain: &DomainName, target: &str) -> AliasRecord {
    let target = target.trim_end_matches('.');
    AliasRecord {
        name: format!("{}.{}", site, domain.fqdn()),
        target: format!("{}.", target),
        target_zone_id: CLOUDFRONT_HOSTED_ZONE_ID.to_string(),
        evaluate_target_health: false,
    }
}

pub struct NameProvisioner<'a, P: DnsOps> {
    dns: &'a P,
}

impl<'a, P: DnsOps> NameProvisioner<'a, P> {
    pub fn new(dns: &'a P) -> Self {
        Self { dns }
    }

    /// The hosted zone named exactly `domain`. Zones are never created.
    pub async fn find_zone(&self, domain: &DomainName) -> Result<ZoneId, DeployError> {
        let wanted = domain.fqdn();
        let zones = self.dns.list_zones().await.during("list_zones")?;

        let zone = zones
            .iter()
            .find(|zone| normalize_zone_name(&zone.name) == wanted)
            .ok_or_else(|| DeployError::NotFound(format!("hosted zone for {}", wanted)))?;

        let id = ZoneId::from_provider(&zone.id);
        tracing::debug!(zone = %id, domain = %domain, "hosted zone found");
        Ok(id)
    }

    /// Create or replace the alias record for the site host.
    pub async fn upsert_alias(
        &self,
        zone: &ZoneId,
        site: &SiteName,
        domain: &DomainName,
        target: &str,
    ) -> Result<(), DeployError> {
        let record = alias_record(site, domain, target);
        self.dns
            .upsert_alias_record(zone, &record)
            .await
            .during("upsert_alias_record")?;
        tracing::info!(record = %record.name, target = %record.target, "alias record upserted");
        Ok(())
    }
}

fn normalize_zone_name(name: &str) -> String {
    let lowered = name.trim().to_ascii_lowercase();
    if lowered.ends_with('.') {
        lowered
    } else {
        format!("{}.", lowered)
    }
}
