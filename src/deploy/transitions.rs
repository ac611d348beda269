// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state, or itself and the error.

use crate::provider::{DistributionOps, DnsOps, ObjectStore};
use crate::provision::{EdgeProvisioner, NameProvisioner, OriginProvisioner};
use crate::publish::{ContentPublisher, PublishError};

use super::Deployment;
use super::error::DeployError;
use super::orchestrator::DeploymentOutcome;
use super::rollback::Compensation;
use super::state::{ContentPublished, EdgeReady, Init, NameReady, OriginReady};

/// Result type for transitions that may need rollback on failure.
pub type TransitionResult<T, S> = Result<Deployment<T>, (Deployment<S>, DeployError)>;

impl<S> Deployment<S> {
    /// Internal helper to move to the next state.
    fn advance<T>(self, state: T) -> Deployment<T> {
        let Deployment {
            request,
            host,
            content,
            rollback,
            state: _,
        } = self;
        Deployment {
            request,
            host,
            content,
            rollback,
            state,
        }
    }
}

// =============================================================================
// Init -> OriginReady
// =============================================================================

impl Deployment<Init> {
    /// Create or reuse the origin and configure it for public website hosting.
    ///
    /// Registers origin removal when this run created the origin, including
    /// when a configuration call failed after creation.
    #[must_use = "deployment state must be used"]
    pub async fn provision_origin<P: ObjectStore>(
        mut self,
        store: &P,
        index_document: &str,
    ) -> TransitionResult<OriginReady, Init> {
        let provisioner = OriginProvisioner::new(store).with_index_document(index_document);
        match provisioner.ensure(&self.host).await {
            Ok(origin) => {
                if origin.created {
                    self.rollback.push(Compensation::RemoveOrigin {
                        name: origin.name.clone(),
                    });
                }
                Ok(self.advance(OriginReady { origin }))
            }
            Err(failure) => {
                if failure.created {
                    self.rollback.push(Compensation::RemoveOrigin {
                        name: self.host.clone(),
                    });
                }
                Err((self, failure.error))
            }
        }
    }
}

// =============================================================================
// OriginReady -> ContentPublished
// =============================================================================

impl Deployment<OriginReady> {
    /// Upload every content file into the origin.
    #[must_use = "deployment state must be used"]
    pub async fn publish_content<P: ObjectStore>(
        self,
        store: &P,
        concurrency: usize,
    ) -> TransitionResult<ContentPublished, OriginReady> {
        let result = ContentPublisher::new(store)
            .with_concurrency(concurrency)
            .publish(&self.state.origin.name, &self.content)
            .await;

        match result {
            Ok(published) => {
                let origin = self.state.origin.clone();
                Ok(self.advance(ContentPublished { origin, published }))
            }
            Err(e) => {
                let error = match &e {
                    PublishError::Content { .. } => DeployError::provider("read_content", &e),
                    PublishError::Upload { .. } => DeployError::provider("put_object", &e),
                };
                Err((self, error))
            }
        }
    }
}

// =============================================================================
// ContentPublished -> EdgeReady
// =============================================================================

impl Deployment<ContentPublished> {
    /// Create the distribution in front of the origin's website endpoint.
    #[must_use = "deployment state must be used"]
    pub async fn provision_edge<P: DistributionOps>(
        mut self,
        cdn: &P,
    ) -> TransitionResult<EdgeReady, ContentPublished> {
        let result = EdgeProvisioner::new(cdn)
            .create(
                &self.host,
                &self.state.origin.endpoint,
                self.request.certificate(),
            )
            .await;

        match result {
            Ok(edge) => {
                self.rollback.push(Compensation::TeardownEdge {
                    id: edge.id.clone(),
                });
                let ContentPublished { origin, published } = self.state.clone();
                Ok(self.advance(EdgeReady {
                    origin,
                    published,
                    edge,
                }))
            }
            Err(e) => Err((self, e)),
        }
    }
}

// =============================================================================
// EdgeReady -> NameReady
// =============================================================================

impl Deployment<EdgeReady> {
    /// Point `<site>.<domain>.` at the distribution.
    #[must_use = "deployment state must be used"]
    pub async fn bind_name<P: DnsOps>(self, dns: &P) -> TransitionResult<NameReady, EdgeReady> {
        let names = NameProvisioner::new(dns);

        let zone = match names.find_zone(self.request.domain()).await {
            Ok(zone) => zone,
            Err(e) => return Err((self, e)),
        };

        let bound = names
            .upsert_alias(
                &zone,
                self.request.site(),
                self.request.domain(),
                &self.state.edge.domain_name,
            )
            .await;

        match bound {
            Ok(()) => {
                let EdgeReady {
                    origin,
                    published,
                    edge,
                } = self.state.clone();
                Ok(self.advance(NameReady {
                    origin,
                    published,
                    edge,
                    zone,
                }))
            }
            Err(e) => Err((self, e)),
        }
    }
}

// =============================================================================
// NameReady -> done
// =============================================================================

impl Deployment<NameReady> {
    /// Finish the run. Nothing created so far will be rolled back.
    pub fn finish(self) -> DeploymentOutcome {
        let Deployment {
            host,
            rollback,
            state,
            ..
        } = self;
        rollback.commit();

        DeploymentOutcome {
            url: format!("https://{}", host),
            host,
            origin_endpoint: state.origin.endpoint,
            origin_created: state.origin.created,
            distribution_id: state.edge.id,
            distribution_domain: state.edge.domain_name,
            zone_id: state.zone,
            files_published: state.published.files,
            bytes_published: state.published.bytes,
        }
    }
}
