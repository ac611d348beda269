// ABOUTME: CDN distribution operations trait.
// ABOUTME: Create, read, update, poll and delete distributions guarded by concurrency tokens.

use super::sealed::Sealed;
use super::shared_types::{
    ConcurrencyToken, DistributionConfig, DistributionStatus, DistributionSummary,
};
use crate::types::DistributionId;
use async_trait::async_trait;

/// Distribution lifecycle operations.
#[async_trait]
pub trait DistributionOps: Sealed + Send + Sync {
    /// Create a distribution. It is still propagating when this returns.
    async fn create_distribution(
        &self,
        config: &DistributionConfig,
    ) -> Result<DistributionSummary, CdnError>;

    /// Current configuration and the token required to change it.
    async fn get_distribution_config(
        &self,
        id: &DistributionId,
    ) -> Result<(DistributionConfig, ConcurrencyToken), CdnError>;

    /// Apply `config` to the distribution. Returns the new token.
    ///
    /// Provider settings outside [`DistributionConfig`] are preserved.
    async fn update_distribution_config(
        &self,
        id: &DistributionId,
        config: &DistributionConfig,
        token: &ConcurrencyToken,
    ) -> Result<ConcurrencyToken, CdnError>;

    /// Propagation status of the latest change.
    async fn distribution_status(
        &self,
        id: &DistributionId,
    ) -> Result<DistributionStatus, CdnError>;

    /// Delete a disabled, fully propagated distribution.
    async fn delete_distribution(
        &self,
        id: &DistributionId,
        token: &ConcurrencyToken,
    ) -> Result<(), CdnError>;
}

/// Errors from distribution operations.
#[derive(Debug, thiserror::Error)]
pub enum CdnError {
    #[error("distribution not found: {0}")]
    NotFound(String),

    #[error("alias already bound to another distribution: {0}")]
    AliasInUse(String),

    #[error("viewer certificate rejected: {0}")]
    InvalidCertificate(String),

    #[error("concurrency token is stale: {0}")]
    PreconditionFailed(String),

    #[error("distribution must be disabled before deletion: {0}")]
    NotDisabled(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("provider error: {0}")]
    Provider(String),
}
