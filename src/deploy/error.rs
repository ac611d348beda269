// ABOUTME: Error types for deployment runs.
// ABOUTME: Validation, provider and not-found failures plus provider error conversion.

use std::fmt;

use crate::provider::{CdnError, DnsError, StoreError};

/// Errors that end a deployment run.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Bad input, detected before any provider call.
    #[error("invalid deployment request: {0}")]
    Validation(String),

    /// A provider call was rejected or returned an unexpected shape.
    #[error("{operation} failed: {message}")]
    Provider {
        operation: &'static str,
        message: String,
    },

    /// A resource that must already exist is missing.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Validation,
    Provider,
    NotFound,
}

impl fmt::Display for DeployErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployErrorKind::Validation => write!(f, "validation"),
            DeployErrorKind::Provider => write!(f, "provider"),
            DeployErrorKind::NotFound => write!(f, "not_found"),
        }
    }
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Validation(_) => DeployErrorKind::Validation,
            DeployError::Provider { .. } => DeployErrorKind::Provider,
            DeployError::NotFound(_) => DeployErrorKind::NotFound,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DeployError::Validation(message.into())
    }

    pub fn provider(operation: &'static str, err: impl fmt::Display) -> Self {
        DeployError::Provider {
            operation,
            message: err.to_string(),
        }
    }

    /// The provider operation that failed, if any.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            DeployError::Provider { operation, .. } => Some(operation),
            _ => None,
        }
    }
}

/// Attach the failing operation to object store errors.
pub trait StoreResultExt<T> {
    fn during(self, operation: &'static str) -> Result<T, DeployError>;
}

impl<T> StoreResultExt<T> for Result<T, StoreError> {
    fn during(self, operation: &'static str) -> Result<T, DeployError> {
        self.map_err(|e| DeployError::provider(operation, e))
    }
}

/// Attach the failing operation to distribution errors.
pub trait CdnResultExt<T> {
    fn during(self, operation: &'static str) -> Result<T, DeployError>;
}

impl<T> CdnResultExt<T> for Result<T, CdnError> {
    fn during(self, operation: &'static str) -> Result<T, DeployError> {
        self.map_err(|e| DeployError::provider(operation, e))
    }
}

/// Attach the failing operation to DNS errors. A missing zone is `NotFound`.
pub trait DnsResultExt<T> {
    fn during(self, operation: &'static str) -> Result<T, DeployError>;
}

impl<T> DnsResultExt<T> for Result<T, DnsError> {
    fn during(self, operation: &'static str) -> Result<T, DeployError> {
        self.map_err(|e| match e {
            DnsError::ZoneNotFound(zone) => DeployError::NotFound(format!("hosted zone {}", zone)),
            other => DeployError::provider(operation, other),
        })
    }
}
