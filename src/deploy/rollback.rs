// ABOUTME: Compensating actions for resources created during a run.
// ABOUTME: The plan is a stack executed in reverse creation order, best effort.

use std::fmt;

use crate::provider::CloudProvider;
use crate::provision::{EdgeProvisioner, OriginProvisioner, TeardownPolicy};
use crate::types::{DistributionId, DomainName};

use super::error::DeployError;

/// Undo step for one created resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    /// Disable and delete a distribution.
    TeardownEdge { id: DistributionId },
    /// Empty and delete an origin bucket.
    RemoveOrigin { name: DomainName },
}

impl fmt::Display for Compensation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compensation::TeardownEdge { id } => write!(f, "tear down distribution {}", id),
            Compensation::RemoveOrigin { name } => write!(f, "remove origin {}", name),
        }
    }
}

/// Compensations registered so far, most recent last.
///
/// A step is pushed only after the provider confirmed the creation. Dropping
/// a plan that still holds steps logs the resources left behind.
#[derive(Debug, Default)]
pub struct RollbackPlan {
    steps: Vec<Compensation>,
}

impl RollbackPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: Compensation) {
        tracing::debug!(step = %step, "compensation registered");
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps in the order they would run.
    pub fn pending(&self) -> impl Iterator<Item = &Compensation> {
        self.steps.iter().rev()
    }

    /// Discard the plan after a successful run.
    pub fn commit(mut self) {
        self.steps.clear();
    }

    /// Run every step, newest first. Failures are recorded and do not stop
    /// the remaining steps.
    pub async fn execute<P: CloudProvider>(
        mut self,
        provider: &P,
        policy: TeardownPolicy,
    ) -> RollbackReport {
        let mut report = RollbackReport::default();
        let steps = std::mem::take(&mut self.steps);

        for step in steps.into_iter().rev() {
            tracing::info!(step = %step, "rolling back");
            let result = match &step {
                Compensation::TeardownEdge { id } => {
                    EdgeProvisioner::new(provider)
                        .with_teardown_policy(policy)
                        .teardown(id)
                        .await
                }
                Compensation::RemoveOrigin { name } => {
                    OriginProvisioner::new(provider).teardown(name).await
                }
            };

            match result {
                Ok(()) => report.completed.push(step),
                Err(error) => {
                    tracing::warn!(step = %step, error = %error, "compensation failed");
                    report.failed.push(RollbackFailure {
                        action: step,
                        error,
                    });
                }
            }
        }

        report
    }
}

impl Drop for RollbackPlan {
    fn drop(&mut self) {
        for step in self.steps.iter().rev() {
            tracing::warn!(step = %step, "rollback plan dropped without running");
        }
    }
}

/// Outcome of executing a [`RollbackPlan`].
#[derive(Debug, Default)]
pub struct RollbackReport {
    pub completed: Vec<Compensation>,
    pub failed: Vec<RollbackFailure>,
}

impl RollbackReport {
    /// True when every compensation succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// True when nothing had to be undone.
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.failed.is_empty()
    }
}

/// A compensation that could not be completed. The resource was left in place.
#[derive(Debug)]
pub struct RollbackFailure {
    pub action: Compensation,
    pub error: DeployError,
}
