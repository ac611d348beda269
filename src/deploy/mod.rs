// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports state markers, the Deployment struct, rollback plan and orchestrator.

mod deployment;
mod error;
mod orchestrator;
mod request;
mod rollback;
mod state;
mod transitions;

pub use deployment::Deployment;
pub use error::{CdnResultExt, DeployError, DeployErrorKind, DnsResultExt, StoreResultExt};
pub use orchestrator::{DeployFailure, DeploySettings, DeploymentOutcome, Orchestrator};
pub use request::{DEFAULT_MAX_CONTENT_SIZE, DeploymentRequest, Preflight};
pub use rollback::{Compensation, RollbackFailure, RollbackPlan, RollbackReport};
pub use state::{
    ContentPublished, DeploymentState, EdgeReady, HasEdge, HasOrigin, Init, NameReady,
    OriginReady, Phase,
};
pub use transitions::TransitionResult;
