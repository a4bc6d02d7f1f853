use crate::dependency_analysis::domain::{BundleSkeleton, DeploymentAnalysisReport};
use crate::shared::Result;
use std::path::PathBuf;

/// DeploymentReportStore port for cached deployment artifacts
///
/// Reports are caches, not sources of truth: a failed load is treated as a
/// cache miss by callers, and a report can always be rebuilt.
pub trait DeploymentReportStore {
    /// Loads the cached report for `scenario`, if one exists
    fn load_report(&self, scenario: &str) -> Result<Option<DeploymentAnalysisReport>>;

    /// Persists a report atomically, returning where it was written
    fn save_report(&self, report: &DeploymentAnalysisReport) -> Result<PathBuf>;

    /// Persists a validated bundle skeleton atomically
    fn save_bundle(&self, skeleton: &BundleSkeleton) -> Result<PathBuf>;
}

impl<T: DeploymentReportStore + ?Sized> DeploymentReportStore for std::sync::Arc<T> {
    fn load_report(&self, scenario: &str) -> Result<Option<DeploymentAnalysisReport>> {
        (**self).load_report(scenario)
    }

    fn save_report(&self, report: &DeploymentAnalysisReport) -> Result<PathBuf> {
        (**self).save_report(report)
    }

    fn save_bundle(&self, skeleton: &BundleSkeleton) -> Result<PathBuf> {
        (**self).save_bundle(skeleton)
    }
}
