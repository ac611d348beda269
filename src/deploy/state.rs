// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Each marker carries the resource handles available in that state.

use std::fmt;

use crate::provision::{EdgeHandle, OriginHandle};
use crate::publish::PublishSummary;
use crate::types::ZoneId;

/// Named phases of a run, for logs and failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Init,
    OriginReady,
    ContentPublished,
    EdgeReady,
    NameReady,
    RollingBack,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::OriginReady => "origin_ready",
            Phase::ContentPublished => "content_published",
            Phase::EdgeReady => "edge_ready",
            Phase::NameReady => "name_ready",
            Phase::RollingBack => "rolling_back",
            Phase::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Implemented by every state marker.
pub trait DeploymentState {
    const PHASE: Phase;
}

/// Preflight passed, nothing provisioned yet.
/// Available actions: `provision_origin()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Init;

/// Origin exists with website hosting and public read.
/// Available actions: `publish_content()`
#[derive(Debug, Clone)]
pub struct OriginReady {
    pub(crate) origin: OriginHandle,
}

/// Every content file is in the origin.
/// Available actions: `provision_edge()`
#[derive(Debug, Clone)]
pub struct ContentPublished {
    pub(crate) origin: OriginHandle,
    pub published: PublishSummary,
}

/// Distribution created in front of the origin.
/// Available actions: `bind_name()`
#[derive(Debug, Clone)]
pub struct EdgeReady {
    pub(crate) origin: OriginHandle,
    pub(crate) published: PublishSummary,
    pub(crate) edge: EdgeHandle,
}

/// Alias record points at the distribution.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct NameReady {
    pub(crate) origin: OriginHandle,
    pub(crate) published: PublishSummary,
    pub(crate) edge: EdgeHandle,
    pub(crate) zone: ZoneId,
}

impl DeploymentState for Init {
    const PHASE: Phase = Phase::Init;
}

impl DeploymentState for OriginReady {
    const PHASE: Phase = Phase::OriginReady;
}

impl DeploymentState for ContentPublished {
    const PHASE: Phase = Phase::ContentPublished;
}

impl DeploymentState for EdgeReady {
    const PHASE: Phase = Phase::EdgeReady;
}

impl DeploymentState for NameReady {
    const PHASE: Phase = Phase::NameReady;
}

/// States in which the origin is ready.
pub trait HasOrigin {
    fn origin(&self) -> &OriginHandle;
}

/// States in which the distribution exists.
pub trait HasEdge {
    fn edge(&self) -> &EdgeHandle;
}

impl HasOrigin for OriginReady {
    fn origin(&self) -> &OriginHandle {
        &self.origin
    }
}

impl HasOrigin for ContentPublished {
    fn origin(&self) -> &OriginHandle {
        &self.origin
    }
}

impl HasOrigin for EdgeReady {
    fn origin(&self) -> &OriginHandle {
        &self.origin
    }
}

impl HasOrigin for NameReady {
    fn origin(&self) -> &OriginHandle {
        &self.origin
    }
}

impl HasEdge for EdgeReady {
    fn edge(&self) -> &EdgeHandle {
        &self.edge
    }
}

impl HasEdge for NameReady {
    fn edge(&self) -> &EdgeHandle {
        &self.edge
    }
}
