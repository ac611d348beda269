// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: Owns the request, scanned content and the rollback plan for one run.

use crate::provision::{EdgeHandle, OriginHandle};
use crate::publish::ContentRoot;
use crate::types::DomainName;

use super::error::DeployError;
use super::request::DeploymentRequest;
use super::rollback::RollbackPlan;
use super::state::{DeploymentState, HasEdge, HasOrigin, Init, Phase};

/// A deployment run, parameterized by its current state.
///
/// The state type `S` carries the handles of resources provisioned so far, so
/// a distribution ID can only be read once the distribution exists. Every
/// confirmed creation is registered in the rollback plan, which travels with
/// the deployment through each transition.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) request: DeploymentRequest,
    pub(crate) host: DomainName,
    pub(crate) content: ContentRoot,
    pub(crate) rollback: RollbackPlan,
    pub(crate) state: S,
}

impl Deployment<Init> {
    /// Validate the request and scan its content root.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Validation` if preflight fails. No provider has
    /// been called at that point.
    pub fn prepare(
        request: DeploymentRequest,
        max_content_size: u64,
    ) -> Result<Self, DeployError> {
        let preflight = request.preflight(max_content_size)?;
        Ok(Deployment {
            request,
            host: preflight.host,
            content: preflight.content,
            rollback: RollbackPlan::new(),
            state: Init,
        })
    }
}

impl<S: DeploymentState> Deployment<S> {
    pub fn request(&self) -> &DeploymentRequest {
        &self.request
    }

    /// `<site>.<domain>`: origin name, distribution alias and record name.
    pub fn host(&self) -> &DomainName {
        &self.host
    }

    pub fn content(&self) -> &ContentRoot {
        &self.content
    }

    pub fn phase(&self) -> Phase {
        S::PHASE
    }

    pub fn rollback_plan(&self) -> &RollbackPlan {
        &self.rollback
    }

    /// Give up the deployment, keeping only what must be undone.
    pub fn into_rollback_plan(self) -> RollbackPlan {
        self.rollback
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

impl<S: DeploymentState + HasOrigin> Deployment<S> {
    pub fn origin(&self) -> &OriginHandle {
        self.state.origin()
    }
}

impl<S: DeploymentState + HasEdge> Deployment<S> {
    pub fn edge(&self) -> &EdgeHandle {
        self.state.edge()
    }
}
