// ABOUTME: DnsOps implementation for Route 53 hosted zones.
// ABOUTME: Lists zones page by page and upserts alias A records.

use async_trait::async_trait;
use aws_sdk_route53::error::{BuildError, ProvideErrorMetadata, SdkError};
use aws_sdk_route53::types::{
    AliasTarget, Change, ChangeAction, ChangeBatch, HostedZoneConfig, ResourceRecordSet, RrType,
};

use super::{AwsProvider, describe, error_code, present};
use crate::provider::traits::{AliasRecord, DnsError, DnsOps, HostedZone};
use crate::types::ZoneId;

const CHANGE_COMMENT: &str = "Alias for CloudFront static site";

fn map_dns_error<E, R>(err: SdkError<E, R>, target: &str) -> DnsError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug + 'static,
{
    let message = format!("{}: {}", target, describe(&err));
    match error_code(&err) {
        Some("NoSuchHostedZone") => DnsError::ZoneNotFound(target.to_string()),
        Some("InvalidChangeBatch") | Some("InvalidInput") | Some("AccessDenied") => {
            DnsError::Rejected(message)
        }
        _ => DnsError::Provider(message),
    }
}

fn map_build_error(err: BuildError) -> DnsError {
    DnsError::Rejected(format!("invalid record change: {}", err))
}

#[async_trait]
impl DnsOps for AwsProvider {
    async fn list_zones(&self) -> Result<Vec<HostedZone>, DnsError> {
        let mut zones = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let output = self
                .route53
                .list_hosted_zones()
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| map_dns_error(e, "hosted zones"))?;

            zones.extend(output.hosted_zones().iter().map(|zone| HostedZone {
                id: zone.id().to_string(),
                name: zone.name().to_string(),
                private: present::<&HostedZoneConfig>(zone.config())
                    .map(|config| config.private_zone())
                    .unwrap_or(false),
            }));

            let truncated = present::<bool>(output.is_truncated()).unwrap_or(false);
            match present::<&str>(output.next_marker()) {
                Some(next) if truncated => marker = Some(next.to_string()),
                _ => break,
            }
        }

        Ok(zones)
    }

    async fn upsert_alias_record(
        &self,
        zone: &ZoneId,
        record: &AliasRecord,
    ) -> Result<(), DnsError> {
        let alias = AliasTarget::builder()
            .hosted_zone_id(&record.target_zone_id)
            .dns_name(&record.target)
            .evaluate_target_health(record.evaluate_target_health)
            .build()
            .map_err(map_build_error)?;

        let record_set = ResourceRecordSet::builder()
            .name(&record.name)
            .r#type(RrType::A)
            .alias_target(alias)
            .build()
            .map_err(map_build_error)?;

        let change = Change::builder()
            .action(ChangeAction::Upsert)
            .resource_record_set(record_set)
            .build()
            .map_err(map_build_error)?;

        let batch = ChangeBatch::builder()
            .comment(CHANGE_COMMENT)
            .changes(change)
            .build()
            .map_err(map_build_error)?;

        self.route53
            .change_resource_record_sets()
            .hosted_zone_id(zone.as_str())
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| map_dns_error(e, zone.as_str()))?;

        tracing::debug!(zone = %zone, record = %record.name, "alias record upserted");
        Ok(())
    }
}
