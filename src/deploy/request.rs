// ABOUTME: Deployment request: site, domain, content root, certificate and region.
// ABOUTME: Preflight validation runs before any provider call.

use std::path::{Path, PathBuf};

use crate::publish::ContentRoot;
use crate::types::{DomainName, SiteName};

use super::error::DeployError;

/// Default ceiling on total content size (50 MiB).
pub const DEFAULT_MAX_CONTENT_SIZE: u64 = 50 * 1024 * 1024;

/// Immutable input of one deployment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    site: SiteName,
    domain: DomainName,
    content_root: PathBuf,
    certificate: String,
    region: String,
}

/// Output of a successful preflight.
#[derive(Debug, Clone)]
pub struct Preflight {
    /// `<site>.<domain>`: origin name and distribution alias.
    pub host: DomainName,
    pub content: ContentRoot,
}

impl DeploymentRequest {
    pub fn new(
        site: SiteName,
        domain: DomainName,
        content_root: impl Into<PathBuf>,
        certificate: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            site,
            domain,
            content_root: content_root.into(),
            certificate: certificate.into(),
            region: region.into(),
        }
    }

    pub fn site(&self) -> &SiteName {
        &self.site
    }

    pub fn domain(&self) -> &DomainName {
        &self.domain
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    /// Viewer certificate identifier (an ACM ARN for AWS).
    pub fn certificate(&self) -> &str {
        &self.certificate
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// The site host `<site>.<domain>`.
    pub fn host(&self) -> Result<DomainName, DeployError> {
        self.domain
            .child(&self.site)
            .map_err(|e| DeployError::validation(format!("invalid site host: {}", e)))
    }

    /// Check every field and scan the content root.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Validation` for blank fields, an unreadable
    /// content root, or content larger than `max_content_size` bytes.
    pub fn preflight(&self, max_content_size: u64) -> Result<Preflight, DeployError> {
        if self.certificate.trim().is_empty() {
            return Err(DeployError::validation("certificate must not be empty"));
        }
        if self.region.trim().is_empty() {
            return Err(DeployError::validation("region must not be empty"));
        }
        if self.content_root.as_os_str().is_empty() {
            return Err(DeployError::validation("content root must not be empty"));
        }

        let host = self.host()?;
        let content = ContentRoot::scan(&self.content_root)
            .map_err(|e| DeployError::validation(e.to_string()))?;

        let total = content.total_size();
        if total > max_content_size {
            return Err(DeployError::validation(format!(
                "content root {} is {} bytes, exceeding the {} byte limit",
                self.content_root.display(),
                total,
                max_content_size
            )));
        }
        if content.is_empty() {
            tracing::warn!(root = %self.content_root.display(), "content root has no files");
        }

        tracing::debug!(host = %host, files = content.len(), bytes = total, "preflight passed");
        Ok(Preflight { host, content })
    }
}
