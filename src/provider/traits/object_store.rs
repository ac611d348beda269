// ABOUTME: Object store operations trait for website origins.
// ABOUTME: Create buckets, configure website hosting and policy, upload and delete objects.

use super::sealed::Sealed;
use super::shared_types::{AccessPolicy, WebsiteConfig};
use crate::types::DomainName;
use async_trait::async_trait;
use bytes::Bytes;

/// Origin bucket lifecycle and content operations.
#[async_trait]
pub trait ObjectStore: Sealed + Send + Sync {
    /// Names of every origin visible to the account.
    async fn list_origins(&self) -> Result<Vec<String>, StoreError>;

    /// Create an origin bucket.
    async fn create_origin(&self, name: &DomainName) -> Result<(), StoreError>;

    /// Turn on static website hosting.
    async fn enable_website_hosting(
        &self,
        name: &DomainName,
        website: &WebsiteConfig,
    ) -> Result<(), StoreError>;

    /// Remove the account-level public access block for this origin.
    async fn unblock_public_access(&self, name: &DomainName) -> Result<(), StoreError>;

    /// Replace the origin's access policy.
    async fn set_public_read_policy(
        &self,
        name: &DomainName,
        policy: &AccessPolicy,
    ) -> Result<(), StoreError>;

    /// Upload one object, overwriting any existing object under `key`.
    async fn put_object(
        &self,
        name: &DomainName,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StoreError>;

    /// Delete every object in the origin.
    async fn delete_all_objects(&self, name: &DomainName) -> Result<(), StoreError>;

    /// Delete an (empty) origin.
    async fn delete_origin(&self, name: &DomainName) -> Result<(), StoreError>;

    /// Public website host name of the origin.
    fn website_endpoint(&self, name: &DomainName) -> String;
}

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("origin not found: {0}")]
    NotFound(String),

    #[error("origin name already taken: {0}")]
    AlreadyExists(String),

    #[error("origin is not empty: {0}")]
    NotEmpty(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("provider error: {0}")]
    Provider(String),
}
