// ABOUTME: Shared types used across provider trait definitions.
// ABOUTME: Website and policy settings, distribution config, zones and alias records.

use crate::types::{DistributionId, DomainName};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

// =============================================================================
// Object store
// =============================================================================

/// Website hosting settings for an origin bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteConfig {
    /// Document served for directory requests.
    pub index_document: String,
    /// Document served for missing keys.
    pub error_document: String,
}

impl WebsiteConfig {
    /// Single-page-app routing: every miss falls back to the index document.
    pub fn single_page(index_document: &str) -> Self {
        Self {
            index_document: index_document.to_string(),
            error_document: index_document.to_string(),
        }
    }
}

/// Bucket access policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccessPolicy {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub sid: String,
    pub effect: String,
    pub principal: String,
    pub action: String,
    pub resource: String,
}

impl AccessPolicy {
    /// Anonymous read-only access to every object in the origin.
    pub fn public_read(origin: &DomainName) -> Self {
        Self {
            version: "2012-10-17".to_string(),
            statement: vec![PolicyStatement {
                sid: "PublicReadGetObject".to_string(),
                effect: "Allow".to_string(),
                principal: "*".to_string(),
                action: "s3:GetObject".to_string(),
                resource: format!("arn:aws:s3:::{}/*", origin),
            }],
        }
    }

    /// Render the policy as the JSON document the provider expects.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// =============================================================================
// Distribution
// =============================================================================

/// Opaque token guarding distribution updates (an HTTP ETag for CloudFront).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcurrencyToken(String);

impl ConcurrencyToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConcurrencyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Full configuration of a CDN distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionConfig {
    /// Idempotency key; must be unique per create call and kept on update.
    pub caller_reference: String,
    pub comment: String,
    pub enabled: bool,
    /// Alternate host names served by the distribution.
    pub aliases: Vec<String>,
    pub origin: CustomOrigin,
    pub default_behavior: CacheBehavior,
    pub certificate: ViewerCertificate,
}

/// A non-bucket origin reached over plain HTTP(S).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomOrigin {
    pub id: String,
    pub domain_name: String,
    pub http_port: u16,
    pub https_port: u16,
    pub protocol_policy: OriginProtocolPolicy,
    pub ssl_protocols: Vec<SslProtocol>,
    pub read_timeout: Duration,
    pub keepalive_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheBehavior {
    pub target_origin_id: String,
    pub viewer_protocol_policy: ViewerProtocolPolicy,
    pub allowed_methods: Vec<HttpMethod>,
    pub cache_policy_id: String,
    pub compress: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerCertificate {
    pub certificate_arn: String,
    pub ssl_support_method: SslSupportMethod,
    pub minimum_protocol_version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginProtocolPolicy {
    HttpOnly,
    MatchViewer,
    HttpsOnly,
}

impl OriginProtocolPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OriginProtocolPolicy::HttpOnly => "http-only",
            OriginProtocolPolicy::MatchViewer => "match-viewer",
            OriginProtocolPolicy::HttpsOnly => "https-only",
        }
    }

    pub fn from_provider(value: &str) -> Option<Self> {
        match value {
            "http-only" => Some(OriginProtocolPolicy::HttpOnly),
            "match-viewer" => Some(OriginProtocolPolicy::MatchViewer),
            "https-only" => Some(OriginProtocolPolicy::HttpsOnly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SslProtocol {
    SslV3,
    TlsV1,
    TlsV1_1,
    TlsV1_2,
}

impl SslProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            SslProtocol::SslV3 => "SSLv3",
            SslProtocol::TlsV1 => "TLSv1",
            SslProtocol::TlsV1_1 => "TLSv1.1",
            SslProtocol::TlsV1_2 => "TLSv1.2",
        }
    }

    pub fn from_provider(value: &str) -> Option<Self> {
        match value {
            "SSLv3" => Some(SslProtocol::SslV3),
            "TLSv1" => Some(SslProtocol::TlsV1),
            "TLSv1.1" => Some(SslProtocol::TlsV1_1),
            "TLSv1.2" => Some(SslProtocol::TlsV1_2),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerProtocolPolicy {
    AllowAll,
    RedirectToHttps,
    HttpsOnly,
}

impl ViewerProtocolPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewerProtocolPolicy::AllowAll => "allow-all",
            ViewerProtocolPolicy::RedirectToHttps => "redirect-to-https",
            ViewerProtocolPolicy::HttpsOnly => "https-only",
        }
    }

    pub fn from_provider(value: &str) -> Option<Self> {
        match value {
            "allow-all" => Some(ViewerProtocolPolicy::AllowAll),
            "redirect-to-https" => Some(ViewerProtocolPolicy::RedirectToHttps),
            "https-only" => Some(ViewerProtocolPolicy::HttpsOnly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
    Options,
    Put,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn from_provider(value: &str) -> Option<Self> {
        match value {
            "GET" => Some(HttpMethod::Get),
            "HEAD" => Some(HttpMethod::Head),
            "OPTIONS" => Some(HttpMethod::Options),
            "PUT" => Some(HttpMethod::Put),
            "POST" => Some(HttpMethod::Post),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            _ => None,
        }
    }

    /// Methods that never mutate origin content.
    pub fn read_only() -> Vec<HttpMethod> {
        vec![HttpMethod::Get, HttpMethod::Head]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SslSupportMethod {
    SniOnly,
    Vip,
    StaticIp,
}

impl SslSupportMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SslSupportMethod::SniOnly => "sni-only",
            SslSupportMethod::Vip => "vip",
            SslSupportMethod::StaticIp => "static-ip",
        }
    }

    pub fn from_provider(value: &str) -> Option<Self> {
        match value {
            "sni-only" => Some(SslSupportMethod::SniOnly),
            "vip" => Some(SslSupportMethod::Vip),
            "static-ip" => Some(SslSupportMethod::StaticIp),
            _ => None,
        }
    }
}

/// Identifiers returned when a distribution is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionSummary {
    pub id: DistributionId,
    /// Provider-assigned host name, e.g. `d111111abcdef8.cloudfront.net`.
    pub domain_name: String,
}

/// Propagation state of the last configuration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionStatus {
    InProgress,
    Deployed,
}

impl fmt::Display for DistributionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionStatus::InProgress => write!(f, "InProgress"),
            DistributionStatus::Deployed => write!(f, "Deployed"),
        }
    }
}

// =============================================================================
// DNS
// =============================================================================

/// A hosted zone as listed by the DNS provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedZone {
    /// Raw provider ID (may carry a `/hostedzone/` prefix).
    pub id: String,
    /// Zone name in trailing-dot form.
    pub name: String,
    pub private: bool,
}

/// An alias (`A`) record pointing a name at another provider-managed name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRecord {
    /// Record name in trailing-dot form.
    pub name: String,
    /// Alias target in trailing-dot form.
    pub target: String,
    /// Hosted zone that owns the alias target.
    pub target_zone_id: String,
    pub evaluate_target_health: bool,
}
