// ABOUTME: CDN distribution provisioning and compensating teardown.
// ABOUTME: Teardown disables, polls until settled with backoff, then deletes.

use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;

use crate::deploy::{CdnResultExt, DeployError};
use crate::provider::{
    CacheBehavior, CustomOrigin, DistributionConfig, DistributionOps, DistributionStatus,
    HttpMethod, OriginProtocolPolicy, SslProtocol, SslSupportMethod, ViewerCertificate,
    ViewerProtocolPolicy,
};
use crate::types::{DistributionId, DomainName};

/// Identifier of the single origin inside the distribution.
pub const ORIGIN_ID: &str = "S3-origin";

/// Managed "CachingOptimized" cache policy.
pub const CACHING_OPTIMIZED_POLICY_ID: &str = "658327ea-f89d-4fab-a63d-7e88639e58f6";

/// Minimum TLS version offered to viewers.
pub const MINIMUM_VIEWER_PROTOCOL: &str = "TLSv1.2_2021";

const CALLER_REFERENCE_PREFIX: &str = "edgesite";
const ORIGIN_READ_TIMEOUT: Duration = Duration::from_secs(30);
const ORIGIN_KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(5);

/// A created distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeHandle {
    pub id: DistributionId,
    /// Provider host name, used as the DNS alias target.
    pub domain_name: String,
}

/// Bounds for waiting on a disabled distribution to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeardownPolicy {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub max_wait: Duration,
}

impl Default for TeardownPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(5),
            max_interval: Duration::from_secs(60),
            max_wait: Duration::from_secs(20 * 60),
        }
    }
}

impl TeardownPolicy {
    /// Doubled wait after `interval`, capped at `max_interval`.
    pub fn next_interval(&self, interval: Duration) -> Duration {
        interval.saturating_mul(2).min(self.max_interval)
    }
}

/// Fresh idempotency key for a create call.
pub fn caller_reference() -> String {
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1_000);
    format!("{}-{}", CALLER_REFERENCE_PREFIX, nanos)
}

/// Distribution fronting a website origin under a single alias.
pub fn distribution_config(
    alias: &DomainName,
    origin_endpoint: &str,
    certificate_arn: &str,
    caller_reference: String,
) -> DistributionConfig {
    DistributionConfig {
        caller_reference,
        comment: format!("CloudFront distribution for {}", alias),
        enabled: true,
        aliases: vec![alias.to_string()],
        origin: CustomOrigin {
            id: ORIGIN_ID.to_string(),
            domain_name: origin_endpoint.to_string(),
            http_port: 80,
            https_port: 443,
            // website endpoints only speak plain HTTP
            protocol_policy: OriginProtocolPolicy::HttpOnly,
            ssl_protocols: vec![SslProtocol::TlsV1_2],
            read_timeout: ORIGIN_READ_TIMEOUT,
            keepalive_timeout: ORIGIN_KEEPALIVE_TIMEOUT,
        },
        default_behavior: CacheBehavior {
            target_origin_id: ORIGIN_ID.to_string(),
            viewer_protocol_policy: ViewerProtocolPolicy::RedirectToHttps,
            allowed_methods: HttpMethod::read_only(),
            cache_policy_id: CACHING_OPTIMIZED_POLICY_ID.to_string(),
            compress: true,
        },
        certificate: ViewerCertificate {
            certificate_arn: certificate_arn.to_string(),
            ssl_support_method: SslSupportMethod::SniOnly,
            minimum_protocol_version: MINIMUM_VIEWER_PROTOCOL.to_string(),
        },
    }
}

pub struct EdgeProvisioner<'a, P: DistributionOps> {
    cdn: &'a P,
    policy: TeardownPolicy,
}

impl<'a, P: DistributionOps> EdgeProvisioner<'a, P> {
    pub fn new(cdn: &'a P) -> Self {
        Self {
            cdn,
            policy: TeardownPolicy::default(),
        }
    }

    pub fn with_teardown_policy(mut self, policy: TeardownPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Create the distribution. Returns as soon as the provider accepts it;
    /// propagation continues in the background.
    pub async fn create(
        &self,
        alias: &DomainName,
        origin_endpoint: &str,
        certificate_arn: &str,
    ) -> Result<EdgeHandle, DeployError> {
        let config = distribution_config(alias, origin_endpoint, certificate_arn, caller_reference());
        let summary = self
            .cdn
            .create_distribution(&config)
            .await
            .during("create_distribution")?;

        tracing::info!(
            distribution = %summary.id,
            domain = %summary.domain_name,
            alias = %alias,
            "distribution created"
        );
        Ok(EdgeHandle {
            id: summary.id,
            domain_name: summary.domain_name,
        })
    }

    /// Disable and delete a distribution.
    ///
    /// Stops at the first failed step and returns its error after logging it.
    pub async fn teardown(&self, id: &DistributionId) -> Result<(), DeployError> {
        let result = self.disable_and_delete(id).await;
        if let Err(e) = &result {
            tracing::warn!(distribution = %id, error = %e, "distribution teardown incomplete");
        }
        result
    }

    async fn disable_and_delete(&self, id: &DistributionId) -> Result<(), DeployError> {
        let (mut config, token) = self
            .cdn
            .get_distribution_config(id)
            .await
            .during("get_distribution_config")?;

        if config.enabled {
            config.enabled = false;
            self.cdn
                .update_distribution_config(id, &config, &token)
                .await
                .during("update_distribution_config")?;
            tracing::debug!(distribution = %id, "distribution disabled");
        }

        self.wait_until_deployed(id).await?;

        // the update invalidated the earlier token
        let (_, token) = self
            .cdn
            .get_distribution_config(id)
            .await
            .during("get_distribution_config")?;
        self.cdn
            .delete_distribution(id, &token)
            .await
            .during("delete_distribution")?;

        tracing::info!(distribution = %id, "distribution deleted");
        Ok(())
    }

    async fn wait_until_deployed(&self, id: &DistributionId) -> Result<(), DeployError> {
        let started = Instant::now();
        let mut interval = self.policy.initial_interval;

        loop {
            let status = self
                .cdn
                .distribution_status(id)
                .await
                .during("distribution_status")?;
            if status == DistributionStatus::Deployed {
                return Ok(());
            }

            let elapsed = started.elapsed();
            if elapsed >= self.policy.max_wait {
                return Err(DeployError::provider(
                    "wait_for_distribution",
                    format!(
                        "{} still {} after {}s",
                        id,
                        status,
                        self.policy.max_wait.as_secs()
                    ),
                ));
            }

            tracing::debug!(distribution = %id, wait = ?interval, "distribution still propagating");
            tokio::time::sleep(interval.min(self.policy.max_wait - elapsed)).await;
            interval = self.policy.next_interval(interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alias() -> DomainName {
        DomainName::new("myblog.example.com").unwrap()
    }

    #[test]
    fn config_serves_single_alias_over_https() {
        let config = distribution_config(
            &alias(),
            "myblog.example.com.s3-website-us-east-1.amazonaws.com",
            "arn:aws:acm:us-east-1:123456789012:certificate/abc",
            "edgesite-1".to_string(),
        );

        assert_eq!(config.aliases, vec!["myblog.example.com".to_string()]);
        assert_eq!(config.comment, "CloudFront distribution for myblog.example.com");
        assert!(config.enabled);
        assert_eq!(config.origin.id, ORIGIN_ID);
        assert_eq!(config.default_behavior.target_origin_id, ORIGIN_ID);
        assert_eq!(
            config.default_behavior.viewer_protocol_policy,
            ViewerProtocolPolicy::RedirectToHttps
        );
        assert_eq!(
            config.default_behavior.allowed_methods,
            vec![HttpMethod::Get, HttpMethod::Head]
        );
        assert!(config.default_behavior.compress);
        assert_eq!(config.certificate.ssl_support_method, SslSupportMethod::SniOnly);
        assert_eq!(config.certificate.minimum_protocol_version, "TLSv1.2_2021");
    }

    #[test]
    fn origin_is_http_only_with_fixed_timeouts() {
        let config = distribution_config(&alias(), "endpoint", "arn", "ref".to_string());

        assert_eq!(config.origin.protocol_policy, OriginProtocolPolicy::HttpOnly);
        assert_eq!(config.origin.http_port, 80);
        assert_eq!(config.origin.https_port, 443);
        assert_eq!(config.origin.ssl_protocols, vec![SslProtocol::TlsV1_2]);
        assert_eq!(config.origin.read_timeout, Duration::from_secs(30));
        assert_eq!(config.origin.keepalive_timeout, Duration::from_secs(5));
    }

    #[test]
    fn caller_reference_is_prefixed_with_timestamp() {
        let reference = caller_reference();
        let nanos = reference.strip_prefix("edgesite-").unwrap();
        assert!(nanos.parse::<i64>().unwrap() > 0);
    }

    #[test]
    fn default_policy_bounds_wait_at_twenty_minutes() {
        let policy = TeardownPolicy::default();
        assert_eq!(policy.initial_interval, Duration::from_secs(5));
        assert_eq!(policy.max_interval, Duration::from_secs(60));
        assert_eq!(policy.max_wait, Duration::from_secs(1200));
    }

    #[test]
    fn next_interval_doubles_up_to_cap() {
        let policy = TeardownPolicy::default();
        assert_eq!(policy.next_interval(Duration::from_secs(5)), Duration::from_secs(10));
        assert_eq!(policy.next_interval(Duration::from_secs(40)), Duration::from_secs(60));
    }

    #[test]
    fn next_interval_saturates_instead_of_overflowing() {
        let policy = TeardownPolicy {
            initial_interval: Duration::MAX,
            max_interval: Duration::MAX,
            max_wait: Duration::MAX,
        };
        assert_eq!(policy.next_interval(Duration::MAX), Duration::MAX);
    }
}
