// ABOUTME: Origin bucket provisioning: create-or-reuse plus website configuration.
// ABOUTME: Reports whether this run created the origin so rollback can remove it.

use crate::deploy::{DeployError, StoreResultExt};
use crate::provider::{AccessPolicy, ObjectStore, WebsiteConfig};
use crate::types::DomainName;

/// Index document used when none is configured.
pub const DEFAULT_INDEX_DOCUMENT: &str = "index.html";

/// A ready origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginHandle {
    pub name: DomainName,
    /// Public website host name.
    pub endpoint: String,
    /// True when this run created the origin.
    pub created: bool,
}

/// Failure from [`OriginProvisioner::ensure`].
///
/// `created` is true when the origin was created before a later
/// configuration call failed; the caller owns its removal.
#[derive(Debug)]
pub struct OriginFailure {
    pub created: bool,
    pub error: DeployError,
}

pub struct OriginProvisioner<'a, P: ObjectStore> {
    store: &'a P,
    index_document: String,
}

impl<'a, P: ObjectStore> OriginProvisioner<'a, P> {
    pub fn new(store: &'a P) -> Self {
        Self {
            store,
            index_document: DEFAULT_INDEX_DOCUMENT.to_string(),
        }
    }

    pub fn with_index_document(mut self, index_document: &str) -> Self {
        self.index_document = index_document.to_string();
        self
    }

    /// Create the origin if it does not exist, then (re)apply website hosting,
    /// public access and the public-read policy.
    pub async fn ensure(&self, name: &DomainName) -> Result<OriginHandle, OriginFailure> {
        let existing = self
            .store
            .list_origins()
            .await
            .during("list_origins")
            .map_err(|error| OriginFailure {
                created: false,
                error,
            })?;

        let created = if existing.iter().any(|origin| origin == name.as_str()) {
            tracing::info!(origin = %name, "reusing existing origin");
            false
        } else {
            self.store
                .create_origin(name)
                .await
                .during("create_origin")
                .map_err(|error| OriginFailure {
                    created: false,
                    error,
                })?;
            tracing::info!(origin = %name, "origin created");
            true
        };

        self.configure(name)
            .await
            .map_err(|error| OriginFailure { created, error })?;

        Ok(OriginHandle {
            name: name.clone(),
            endpoint: self.store.website_endpoint(name),
            created,
        })
    }

    async fn configure(&self, name: &DomainName) -> Result<(), DeployError> {
        self.store
            .enable_website_hosting(name, &WebsiteConfig::single_page(&self.index_document))
            .await
            .during("enable_website_hosting")?;
        self.store
            .unblock_public_access(name)
            .await
            .during("unblock_public_access")?;
        self.store
            .set_public_read_policy(name, &AccessPolicy::public_read(name))
            .await
            .during("set_public_read_policy")?;
        tracing::debug!(origin = %name, "website hosting and public read configured");
        Ok(())
    }

    /// Empty and delete the origin.
    pub async fn teardown(&self, name: &DomainName) -> Result<(), DeployError> {
        self.store
            .delete_all_objects(name)
            .await
            .during("delete_all_objects")?;
        self.store
            .delete_origin(name)
            .await
            .during("delete_origin")?;
        tracing::info!(origin = %name, "origin removed");
        Ok(())
    }
}
