use crate::dependency_analysis::domain::{
    BundleSkeleton, DependencyDiff, DependencyType, DeploymentAnalysisReport, DiffDetail,
    ScenarioDependency,
};
use crate::dependency_analysis::services::ScanOutcome;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Outcome of analyzing one scenario
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub scenario: String,
    pub scan: ScanOutcome,
    pub resources: DependencyDiff<DiffDetail>,
    pub scenarios: DependencyDiff<DiffDetail>,
    pub shared_workflows: DependencyDiff<DiffDetail>,
    /// The merged edge set that was (or would have been) persisted
    pub dependencies: Vec<ScenarioDependency>,
    /// False when the store could not be written; the analysis is still valid
    pub persisted: bool,
    /// Declarations added to the manifest, as `type:name`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub applied: Vec<String>,
}

impl AnalysisResponse {
    pub fn has_drift(&self) -> bool {
        !(self.resources.is_empty() && self.scenarios.is_empty() && self.shared_workflows.is_empty())
    }
}

/// One line of a batch analysis
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioAnalysisSummary {
    pub scenario: String,
    pub detected: usize,
    pub missing: usize,
    pub extra: usize,
    pub persisted: bool,
}

impl From<&AnalysisResponse> for ScenarioAnalysisSummary {
    fn from(response: &AnalysisResponse) -> Self {
        let diffs = [&response.resources, &response.scenarios, &response.shared_workflows];
        Self {
            scenario: response.scenario.clone(),
            detected: response.scan.dependencies.len(),
            missing: diffs.iter().map(|d| d.missing.len()).sum(),
            extra: diffs.iter().map(|d| d.extra.len()).sum(),
            persisted: response.persisted,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioFailure {
    pub scenario: String,
    pub error: String,
}

/// Outcome of analyzing every scenario in the workspace
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchAnalysisResponse {
    pub analyzed: Vec<ScenarioAnalysisSummary>,
    pub failures: Vec<ScenarioFailure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Used in source but missing from the manifest
    AddDeclaration,
    /// Declared optional resource that nothing uses
    DisableUnused,
    /// Blocks a tier and has a known replacement
    TierSwap,
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendationKind::AddDeclaration => write!(f, "add_declaration"),
            RecommendationKind::DisableUnused => write!(f, "disable_unused"),
            RecommendationKind::TierSwap => write!(f, "tier_swap"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationRecommendation {
    pub kind: RecommendationKind,
    pub dependency_type: DependencyType,
    pub dependency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResponse {
    pub scenario: String,
    pub recommendations: Vec<OptimizationRecommendation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub applied: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeploymentResponse {
    pub report: DeploymentAnalysisReport,
    /// True when the cached report was fresh and returned as-is
    pub from_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BundleResponse {
    pub skeleton: BundleSkeleton,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written_to: Option<PathBuf>,
}
