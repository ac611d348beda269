// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects warnings that shouldn't fail a deployment but should be shown to users.

use crate::deploy::RollbackReport;

/// Collects non-fatal warnings during deployment operations.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    /// Record one warning per compensation that failed during rollback.
    pub fn record_rollback(&mut self, report: &RollbackReport) {
        for failure in &report.failed {
            self.warn(Warning::rollback_failed(format!(
                "rollback step '{}' failed: {}",
                failure.action, failure.error
            )));
        }
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// A compensation step failed; the resource may still exist.
    pub fn rollback_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::RollbackFailed,
            message: message.into(),
        }
    }

    pub fn empty_content(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::EmptyContent,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A compensation failed; cloud resources may need manual cleanup.
    RollbackFailed,
    /// The content root had no files to publish.
    EmptyContent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::{Compensation, DeployError, RollbackFailure};
    use crate::types::DistributionId;

    #[test]
    fn diagnostics_starts_empty() {
        let diag = Diagnostics::default();
        assert!(!diag.has_warnings());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn diagnostics_collects_warnings() {
        let mut diag = Diagnostics::default();

        diag.warn(Warning::rollback_failed("origin still exists"));
        diag.warn(Warning::empty_content("nothing to upload"));

        assert!(diag.has_warnings());
        assert_eq!(diag.warnings().len(), 2);
    }

    #[test]
    fn warning_constructors_set_correct_kind() {
        assert_eq!(
            Warning::rollback_failed("test").kind,
            WarningKind::RollbackFailed
        );
        assert_eq!(Warning::empty_content("test").kind, WarningKind::EmptyContent);
    }

    #[test]
    fn rollback_failures_become_warnings() {
        let report = RollbackReport {
            completed: Vec::new(),
            failed: vec![RollbackFailure {
                action: Compensation::TeardownEdge {
                    id: DistributionId::new("E123"),
                },
                error: DeployError::provider("delete_distribution", "throttled"),
            }],
        };

        let mut diag = Diagnostics::default();
        diag.record_rollback(&report);

        assert_eq!(diag.warnings().len(), 1);
        assert_eq!(diag.warnings()[0].kind, WarningKind::RollbackFailed);
        assert!(diag.warnings()[0].message.contains("E123"));
    }
}
