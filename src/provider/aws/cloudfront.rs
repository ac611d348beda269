// ABOUTME: DistributionOps implementation for CloudFront.
// ABOUTME: Converts between DistributionConfig and the SDK model; maps CloudFront error codes.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_cloudfront::error::{BuildError, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudfront::types as cf;

use super::{AwsProvider, describe, error_code, present};
use crate::provider::traits::{
    CacheBehavior, CdnError, ConcurrencyToken, CustomOrigin, DistributionConfig, DistributionOps,
    DistributionStatus, DistributionSummary, HttpMethod, OriginProtocolPolicy, SslProtocol,
    SslSupportMethod, ViewerCertificate, ViewerProtocolPolicy,
};
use crate::types::DistributionId;

const STATUS_DEPLOYED: &str = "Deployed";

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_cdn_error<E, R>(err: SdkError<E, R>, target: &str) -> CdnError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug + 'static,
{
    let message = format!("{}: {}", target, describe(&err));
    match error_code(&err) {
        Some("NoSuchDistribution") => CdnError::NotFound(target.to_string()),
        Some("CNAMEAlreadyExists") => CdnError::AliasInUse(message),
        Some("InvalidViewerCertificate") => CdnError::InvalidCertificate(message),
        Some("PreconditionFailed") | Some("InvalidIfMatchVersion") => {
            CdnError::PreconditionFailed(message)
        }
        Some("DistributionNotDisabled") => CdnError::NotDisabled(target.to_string()),
        Some("InvalidArgument")
        | Some("InvalidOrigin")
        | Some("IllegalUpdate")
        | Some("AccessDenied")
        | Some("TooManyDistributions") => CdnError::Rejected(message),
        _ => CdnError::Provider(message),
    }
}

fn map_build_error(err: BuildError) -> CdnError {
    CdnError::Rejected(format!("invalid distribution config: {}", err))
}

fn missing(field: &str) -> CdnError {
    CdnError::Provider(format!("distribution response missing {}", field))
}

fn seconds(duration: Duration) -> i32 {
    i32::try_from(duration.as_secs()).unwrap_or(i32::MAX)
}

// =============================================================================
// Model Conversion
// =============================================================================

fn to_aws(config: &DistributionConfig) -> Result<cf::DistributionConfig, BuildError> {
    let origin = &config.origin;
    let ssl_protocols: Vec<cf::SslProtocol> = origin
        .ssl_protocols
        .iter()
        .map(|p| cf::SslProtocol::from(p.as_str()))
        .collect();

    let custom_origin = cf::CustomOriginConfig::builder()
        .http_port(i32::from(origin.http_port))
        .https_port(i32::from(origin.https_port))
        .origin_protocol_policy(cf::OriginProtocolPolicy::from(
            origin.protocol_policy.as_str(),
        ))
        .origin_ssl_protocols(
            cf::OriginSslProtocols::builder()
                .quantity(ssl_protocols.len() as i32)
                .set_items(Some(ssl_protocols))
                .build()?,
        )
        .origin_read_timeout(seconds(origin.read_timeout))
        .origin_keepalive_timeout(seconds(origin.keepalive_timeout))
        .build()?;

    let origins = cf::Origins::builder()
        .quantity(1)
        .items(
            cf::Origin::builder()
                .id(&origin.id)
                .domain_name(&origin.domain_name)
                .custom_origin_config(custom_origin)
                .build()?,
        )
        .build()?;

    let behavior = &config.default_behavior;
    let methods: Vec<cf::Method> = behavior
        .allowed_methods
        .iter()
        .map(|m| cf::Method::from(m.as_str()))
        .collect();

    let default_cache_behavior = cf::DefaultCacheBehavior::builder()
        .target_origin_id(&behavior.target_origin_id)
        .viewer_protocol_policy(cf::ViewerProtocolPolicy::from(
            behavior.viewer_protocol_policy.as_str(),
        ))
        .allowed_methods(
            cf::AllowedMethods::builder()
                .quantity(methods.len() as i32)
                .set_items(Some(methods))
                .build()?,
        )
        .cache_policy_id(&behavior.cache_policy_id)
        .compress(behavior.compress)
        .build()?;

    let certificate = cf::ViewerCertificate::builder()
        .acm_certificate_arn(&config.certificate.certificate_arn)
        .ssl_support_method(cf::SslSupportMethod::from(
            config.certificate.ssl_support_method.as_str(),
        ))
        .minimum_protocol_version(cf::MinimumProtocolVersion::from(
            config.certificate.minimum_protocol_version.as_str(),
        ))
        .build();

    let aliases = cf::Aliases::builder()
        .quantity(config.aliases.len() as i32)
        .set_items(Some(config.aliases.clone()))
        .build()?;

    cf::DistributionConfig::builder()
        .caller_reference(&config.caller_reference)
        .comment(&config.comment)
        .enabled(config.enabled)
        .origins(origins)
        .default_cache_behavior(default_cache_behavior)
        .viewer_certificate(certificate)
        .aliases(aliases)
        .build()
}

fn from_aws(config: &cf::DistributionConfig) -> Result<DistributionConfig, CdnError> {
    let origin = present::<&cf::Origins>(config.origins())
        .and_then(|origins| origins.items().first())
        .ok_or_else(|| missing("origin"))?;
    let custom = present::<&cf::CustomOriginConfig>(origin.custom_origin_config())
        .ok_or_else(|| missing("custom origin config"))?;
    let protocol_policy = present::<&cf::OriginProtocolPolicy>(custom.origin_protocol_policy())
        .and_then(|p| OriginProtocolPolicy::from_provider(p.as_str()))
        .ok_or_else(|| missing("origin protocol policy"))?;

    let behavior = present::<&cf::DefaultCacheBehavior>(config.default_cache_behavior())
        .ok_or_else(|| missing("default cache behavior"))?;
    let viewer_protocol_policy =
        present::<&cf::ViewerProtocolPolicy>(behavior.viewer_protocol_policy())
            .and_then(|p| ViewerProtocolPolicy::from_provider(p.as_str()))
            .ok_or_else(|| missing("viewer protocol policy"))?;

    let certificate = present::<&cf::ViewerCertificate>(config.viewer_certificate())
        .ok_or_else(|| missing("viewer certificate"))?;

    Ok(DistributionConfig {
        caller_reference: present::<&str>(config.caller_reference())
            .unwrap_or_default()
            .to_string(),
        comment: present::<&str>(config.comment())
            .unwrap_or_default()
            .to_string(),
        enabled: present::<bool>(config.enabled()).unwrap_or(false),
        aliases: present::<&cf::Aliases>(config.aliases())
            .map(|aliases| aliases.items().to_vec())
            .unwrap_or_default(),
        origin: CustomOrigin {
            id: present::<&str>(origin.id()).unwrap_or_default().to_string(),
            domain_name: present::<&str>(origin.domain_name())
                .unwrap_or_default()
                .to_string(),
            http_port: present::<i32>(custom.http_port())
                .and_then(|p| u16::try_from(p).ok())
                .unwrap_or(80),
            https_port: present::<i32>(custom.https_port())
                .and_then(|p| u16::try_from(p).ok())
                .unwrap_or(443),
            protocol_policy,
            ssl_protocols: present::<&cf::OriginSslProtocols>(custom.origin_ssl_protocols())
                .map(|protocols| {
                    protocols
                        .items()
                        .iter()
                        .filter_map(|p| SslProtocol::from_provider(p.as_str()))
                        .collect()
                })
                .unwrap_or_default(),
            read_timeout: Duration::from_secs(
                present::<i32>(custom.origin_read_timeout()).unwrap_or(30).max(0) as u64,
            ),
            keepalive_timeout: Duration::from_secs(
                present::<i32>(custom.origin_keepalive_timeout()).unwrap_or(5).max(0) as u64,
            ),
        },
        default_behavior: CacheBehavior {
            target_origin_id: present::<&str>(behavior.target_origin_id())
                .unwrap_or_default()
                .to_string(),
            viewer_protocol_policy,
            allowed_methods: present::<&cf::AllowedMethods>(behavior.allowed_methods())
                .map(|methods| {
                    methods
                        .items()
                        .iter()
                        .filter_map(|m| HttpMethod::from_provider(m.as_str()))
                        .collect()
                })
                .unwrap_or_default(),
            cache_policy_id: present::<&str>(behavior.cache_policy_id())
                .unwrap_or_default()
                .to_string(),
            compress: present::<bool>(behavior.compress()).unwrap_or(false),
        },
        certificate: ViewerCertificate {
            certificate_arn: certificate
                .acm_certificate_arn()
                .unwrap_or_default()
                .to_string(),
            ssl_support_method: certificate
                .ssl_support_method()
                .and_then(|m| SslSupportMethod::from_provider(m.as_str()))
                .unwrap_or(SslSupportMethod::SniOnly),
            minimum_protocol_version: certificate
                .minimum_protocol_version()
                .map(|v| v.as_str().to_string())
                .unwrap_or_default(),
        },
    })
}

/// Apply `config` onto the stored SDK model.
///
/// Sections whose modeled view is unchanged are kept verbatim, so settings
/// such as HTTP version, price class, restrictions and extra cache behaviors
/// survive an update that only toggles `enabled`.
fn overlay(
    stored: &cf::DistributionConfig,
    config: &DistributionConfig,
) -> Result<cf::DistributionConfig, CdnError> {
    let current = from_aws(stored)?;
    let desired = to_aws(config).map_err(map_build_error)?;
    let mut merged = stored.clone();

    merged.enabled = desired.enabled;
    if current.comment != config.comment {
        merged.comment = desired.comment;
    }
    if current.aliases != config.aliases {
        merged.aliases = desired.aliases;
    }
    if current.origin != config.origin {
        merged.origins = desired.origins;
    }
    if current.default_behavior != config.default_behavior {
        merged.default_cache_behavior = desired.default_cache_behavior;
    }
    if current.certificate != config.certificate {
        merged.viewer_certificate = desired.viewer_certificate;
    }

    Ok(merged)
}

impl AwsProvider {
    async fn fetch_distribution_config(
        &self,
        id: &DistributionId,
    ) -> Result<(cf::DistributionConfig, ConcurrencyToken), CdnError> {
        let output = self
            .cloudfront
            .get_distribution_config()
            .id(id.as_str())
            .send()
            .await
            .map_err(|e| map_cdn_error(e, id.as_str()))?;

        let token = output
            .e_tag()
            .map(ConcurrencyToken::new)
            .ok_or_else(|| missing("ETag"))?;
        let config = output
            .distribution_config()
            .cloned()
            .ok_or_else(|| missing("distribution config"))?;

        Ok((config, token))
    }
}

// =============================================================================
// DistributionOps
// =============================================================================

#[async_trait]
impl DistributionOps for AwsProvider {
    async fn create_distribution(
        &self,
        config: &DistributionConfig,
    ) -> Result<DistributionSummary, CdnError> {
        let alias = config.aliases.first().map(String::as_str).unwrap_or("-");
        let output = self
            .cloudfront
            .create_distribution()
            .distribution_config(to_aws(config).map_err(map_build_error)?)
            .send()
            .await
            .map_err(|e| map_cdn_error(e, alias))?;

        let distribution = output.distribution().ok_or_else(|| missing("distribution"))?;
        let id = present::<&str>(distribution.id()).ok_or_else(|| missing("id"))?;
        let domain_name =
            present::<&str>(distribution.domain_name()).ok_or_else(|| missing("domain name"))?;

        Ok(DistributionSummary {
            id: DistributionId::new(id),
            domain_name: domain_name.to_string(),
        })
    }

    async fn get_distribution_config(
        &self,
        id: &DistributionId,
    ) -> Result<(DistributionConfig, ConcurrencyToken), CdnError> {
        let (config, token) = self.fetch_distribution_config(id).await?;
        Ok((from_aws(&config)?, token))
    }

    async fn update_distribution_config(
        &self,
        id: &DistributionId,
        config: &DistributionConfig,
        token: &ConcurrencyToken,
    ) -> Result<ConcurrencyToken, CdnError> {
        let (stored, current) = self.fetch_distribution_config(id).await?;
        if current != *token {
            return Err(CdnError::PreconditionFailed(id.to_string()));
        }

        let output = self
            .cloudfront
            .update_distribution()
            .id(id.as_str())
            .if_match(token.as_str())
            .distribution_config(overlay(&stored, config)?)
            .send()
            .await
            .map_err(|e| map_cdn_error(e, id.as_str()))?;

        output
            .e_tag()
            .map(ConcurrencyToken::new)
            .ok_or_else(|| missing("ETag"))
    }

    async fn distribution_status(
        &self,
        id: &DistributionId,
    ) -> Result<DistributionStatus, CdnError> {
        let output = self
            .cloudfront
            .get_distribution()
            .id(id.as_str())
            .send()
            .await
            .map_err(|e| map_cdn_error(e, id.as_str()))?;

        let distribution = output.distribution().ok_or_else(|| missing("distribution"))?;
        match present::<&str>(distribution.status()) {
            Some(STATUS_DEPLOYED) => Ok(DistributionStatus::Deployed),
            _ => Ok(DistributionStatus::InProgress),
        }
    }

    async fn delete_distribution(
        &self,
        id: &DistributionId,
        token: &ConcurrencyToken,
    ) -> Result<(), CdnError> {
        self.cloudfront
            .delete_distribution()
            .id(id.as_str())
            .if_match(token.as_str())
            .send()
            .await
            .map_err(|e| map_cdn_error(e, id.as_str()))?;
        Ok(())
    }
}
