// ABOUTME: Runs a deployment end to end and rolls back on failure.
// ABOUTME: Origin, content, distribution and DNS in order; LIFO compensation otherwise.

use std::fmt;

use serde::Serialize;

use crate::provider::CloudProvider;
use crate::provision::{DEFAULT_INDEX_DOCUMENT, TeardownPolicy};
use crate::publish::DEFAULT_UPLOAD_CONCURRENCY;
use crate::types::{DistributionId, DomainName, ZoneId};

use super::Deployment;
use super::error::DeployError;
use super::request::{DEFAULT_MAX_CONTENT_SIZE, DeploymentRequest};
use super::rollback::RollbackReport;
use super::state::{DeploymentState, Phase};

/// Tunables for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploySettings {
    pub index_document: String,
    pub max_content_size: u64,
    pub upload_concurrency: usize,
    pub teardown: TeardownPolicy,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            index_document: DEFAULT_INDEX_DOCUMENT.to_string(),
            max_content_size: DEFAULT_MAX_CONTENT_SIZE,
            upload_concurrency: DEFAULT_UPLOAD_CONCURRENCY,
            teardown: TeardownPolicy::default(),
        }
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentOutcome {
    pub url: String,
    pub host: DomainName,
    pub origin_endpoint: String,
    pub origin_created: bool,
    pub distribution_id: DistributionId,
    pub distribution_domain: String,
    pub zone_id: ZoneId,
    pub files_published: usize,
    pub bytes_published: u64,
}

/// A failed run.
///
/// `error` is always the error that stopped the pipeline, never a rollback
/// error; those are listed in `rollback`.
#[derive(Debug)]
pub struct DeployFailure {
    /// Last state reached before the failing step.
    pub phase: Phase,
    pub error: DeployError,
    pub rollback: RollbackReport,
}

impl fmt::Display for DeployFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "deployment failed after {}: {}", self.phase, self.error)
    }
}

impl std::error::Error for DeployFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

type Observer<'a> = Box<dyn Fn(Phase) + Send + Sync + 'a>;

/// Drives one deployment run against a provider.
pub struct Orchestrator<'a, P: CloudProvider> {
    provider: &'a P,
    settings: DeploySettings,
    observer: Option<Observer<'a>>,
}

impl<'a, P: CloudProvider> Orchestrator<'a, P> {
    pub fn new(provider: &'a P, settings: DeploySettings) -> Self {
        Self {
            provider,
            settings,
            observer: None,
        }
    }

    /// Called with each phase as the run enters it.
    pub fn with_observer(mut self, observer: impl Fn(Phase) + Send + Sync + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn settings(&self) -> &DeploySettings {
        &self.settings
    }

    fn enter(&self, phase: Phase) {
        tracing::info!(phase = %phase, "deployment phase");
        if let Some(observer) = &self.observer {
            observer(phase);
        }
    }

    /// Run the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns `DeployFailure` carrying the triggering error and the report
    /// of the rollback that followed it.
    pub async fn run(
        &self,
        request: DeploymentRequest,
    ) -> Result<DeploymentOutcome, DeployFailure> {
        let deployment = Deployment::prepare(request, self.settings.max_content_size)
            .map_err(|error| DeployFailure {
                phase: Phase::Init,
                error,
                rollback: RollbackReport::default(),
            })?;
        self.enter(Phase::Init);

        let deployment = match deployment
            .provision_origin(self.provider, &self.settings.index_document)
            .await
        {
            Ok(d) => d,
            Err((failed, e)) => return Err(self.roll_back(failed, e).await),
        };
        self.enter(Phase::OriginReady);

        let deployment = match deployment
            .publish_content(self.provider, self.settings.upload_concurrency)
            .await
        {
            Ok(d) => d,
            Err((failed, e)) => return Err(self.roll_back(failed, e).await),
        };
        self.enter(Phase::ContentPublished);

        let deployment = match deployment.provision_edge(self.provider).await {
            Ok(d) => d,
            Err((failed, e)) => return Err(self.roll_back(failed, e).await),
        };
        self.enter(Phase::EdgeReady);

        let deployment = match deployment.bind_name(self.provider).await {
            Ok(d) => d,
            Err((failed, e)) => return Err(self.roll_back(failed, e).await),
        };
        self.enter(Phase::NameReady);

        Ok(deployment.finish())
    }

    async fn roll_back<S: DeploymentState>(
        &self,
        deployment: Deployment<S>,
        error: DeployError,
    ) -> DeployFailure {
        let phase = deployment.phase();
        tracing::error!(phase = %phase, error = %error, "deployment step failed");

        self.enter(Phase::RollingBack);
        let rollback = deployment
            .into_rollback_plan()
            .execute(self.provider, self.settings.teardown)
            .await;
        self.enter(Phase::Failed);

        DeployFailure {
            phase,
            error,
            rollback,
        }
    }
}
