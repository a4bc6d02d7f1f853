use super::manifest_edits::declare_detected;
use crate::application::dto::{
    OptimizationRecommendation, OptimizationResponse, OptimizeRequest, RecommendationKind,
};
use crate::dependency_analysis::domain::{
    DependencyDiff, DependencyType, DeploymentAnalysisReport, DiffDetail,
};
use crate::dependency_analysis::policies::TierPolicy;
use crate::dependency_analysis::services::{
    diff_by_type, extract_declared, DependencyDetector, DeploymentTierAnalyzer,
};
use crate::ports::outbound::{CatalogSource, ProgressReporter, ScenarioRepository};
use crate::shared::Result;
use tracing::info;

/// OptimizeScenarioUseCase - recommendations from a fresh scan and tier analysis
///
/// # Type Parameters
/// * `R` - ScenarioRepository implementation
/// * `C` - CatalogSource backing the detector
/// * `P` - ProgressReporter implementation
pub struct OptimizeScenarioUseCase<R, C: CatalogSource, P> {
    repository: R,
    detector: DependencyDetector<C>,
    policy: TierPolicy,
    progress_reporter: P,
}

impl<R, C, P> OptimizeScenarioUseCase<R, C, P>
where
    R: ScenarioRepository,
    C: CatalogSource,
    P: ProgressReporter,
{
    pub fn new(
        repository: R,
        detector: DependencyDetector<C>,
        policy: TierPolicy,
        progress_reporter: P,
    ) -> Self {
        Self {
            repository,
            detector,
            policy,
            progress_reporter,
        }
    }

    /// Recommends declarations to add, optional resources to disable and
    /// tier swaps. With `apply`, the first two are written to the manifest.
    ///
    /// # Errors
    /// Returns an error if the scenario cannot be loaded or, with `apply`,
    /// the manifest cannot be rewritten.
    pub fn execute(&self, request: OptimizeRequest) -> Result<OptimizationResponse> {
        let scenario = request.scenario.as_str();
        self.progress_reporter
            .report(&format!("🔧 Optimizing scenario '{}'...", scenario));

        let root = self.repository.scenario_path(scenario)?;
        let manifest = self.repository.load_manifest(scenario)?;
        let scan = self.detector.scan(scenario, &root, &manifest);
        let declared = extract_declared(scenario, &manifest);

        let resources = diff_by_type(&declared, &scan.dependencies, DependencyType::Resource);
        let scenarios = diff_by_type(&declared, &scan.dependencies, DependencyType::Scenario);
        let report = DeploymentTierAnalyzer::new(&self.repository, &self.policy).analyze(scenario)?;

        let mut recommendations = Vec::new();
        recommendations.extend(Self::add_declarations(DependencyType::Resource, &resources));
        recommendations.extend(Self::add_declarations(DependencyType::Scenario, &scenarios));
        recommendations.extend(Self::disable_unused(&resources));
        recommendations.extend(Self::tier_swaps(&report));

        info!(
            scenario,
            recommendations = recommendations.len(),
            "optimization recommendations built"
        );

        let applied = if request.apply {
            self.apply(scenario, &recommendations)?
        } else {
            Vec::new()
        };

        Ok(OptimizationResponse {
            scenario: scenario.to_string(),
            recommendations,
            applied,
        })
    }

    fn add_declarations(
        dependency_type: DependencyType,
        diff: &DependencyDiff<DiffDetail>,
    ) -> Vec<OptimizationRecommendation> {
        diff.missing
            .iter()
            .map(|entry| {
                let seen_in = entry.details.files.first().map(String::as_str).unwrap_or("source");
                OptimizationRecommendation {
                    kind: RecommendationKind::AddDeclaration,
                    dependency_type,
                    dependency: entry.name.clone(),
                    resource_type: entry.details.resource_type.clone(),
                    tier: None,
                    alternative: None,
                    reason: format!("used in {} but not declared", seen_in),
                }
            })
            .collect()
    }

    /// Declared optional resources the scan never saw. Required ones are
    /// left alone: they may be reached in ways no pattern detects.
    fn disable_unused(resources: &DependencyDiff<DiffDetail>) -> Vec<OptimizationRecommendation> {
        resources
            .extra
            .iter()
            .filter(|entry| entry.details.required == Some(false))
            .map(|entry| OptimizationRecommendation {
                kind: RecommendationKind::DisableUnused,
                dependency_type: DependencyType::Resource,
                dependency: entry.name.clone(),
                resource_type: entry.details.resource_type.clone(),
                tier: None,
                alternative: None,
                reason: "declared optional and never referenced in source".to_string(),
            })
            .collect()
    }

    fn tier_swaps(report: &DeploymentAnalysisReport) -> Vec<OptimizationRecommendation> {
        report
            .swaps
            .iter()
            .filter_map(|swap| {
                let alternative = swap.alternatives.first()?;
                let dependency_type = report
                    .dependencies
                    .iter()
                    .find(|node| node.name == swap.dependency)
                    .map_or(DependencyType::Resource, |node| node.dependency_type);
                Some(OptimizationRecommendation {
                    kind: RecommendationKind::TierSwap,
                    dependency_type,
                    dependency: swap.dependency.clone(),
                    resource_type: None,
                    tier: Some(swap.tier.clone()),
                    alternative: Some(alternative.clone()),
                    reason: swap.reason.clone(),
                })
            })
            .collect()
    }

    fn apply(
        &self,
        scenario: &str,
        recommendations: &[OptimizationRecommendation],
    ) -> Result<Vec<String>> {
        let mut document = self.repository.load_document(scenario)?;
        let mut applied = Vec::new();

        for recommendation in recommendations {
            let changed = match recommendation.kind {
                RecommendationKind::AddDeclaration => declare_detected(
                    &mut document,
                    recommendation.dependency_type,
                    &recommendation.dependency,
                    recommendation.resource_type.as_deref(),
                )?,
                RecommendationKind::DisableUnused => {
                    document.set_resource_enabled(&recommendation.dependency, false)?
                }
                RecommendationKind::TierSwap => false,
            };
            if changed {
                applied.push(format!(
                    "{}:{}:{}",
                    recommendation.kind, recommendation.dependency_type, recommendation.dependency
                ));
            }
        }

        if !applied.is_empty() {
            self.repository.save_document(scenario, &document)?;
            self.detector.refresh_catalogs();
            self.progress_reporter.report(&format!(
                "📝 Applied {} change(s) to '{}'",
                applied.len(),
                scenario
            ));
        }
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::filesystem::{FileSystemScenarioWorkspace, WorkspaceLayout};
    use crate::dependency_analysis::domain::ScenarioName;
    use crate::ports::outbound::SilentProgressReporter;
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"{
  "resources": {
    "postgres": {"enabled": true, "required": true},
    "qdrant": {"enabled": true, "required": false}
  },
  "deployment": {
    "tiers": {"desktop": {"status": "supported"}},
    "dependencies": {
      "resources": {
        "postgres": {
          "platform_support": {
            "desktop": {"supported": false, "reason": "needs a server", "alternatives": ["sqlite"]}
          }
        }
      }
    }
  }
}"#;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "notes/.vrooli/service.json", MANIFEST);
        write(
            temp_dir.path(),
            "notes/api/main.go",
            "// redis://cache:6379\nconst dsn = \"postgres://db/notes\"\n",
        );
        temp_dir
    }

    fn optimizer(
        root: &Path,
    ) -> OptimizeScenarioUseCase<
        Arc<FileSystemScenarioWorkspace>,
        Arc<FileSystemScenarioWorkspace>,
        SilentProgressReporter,
    > {
        let workspace = Arc::new(FileSystemScenarioWorkspace::new(WorkspaceLayout::new(root)).unwrap());
        let detector = DependencyDetector::new(Arc::clone(&workspace)).unwrap();
        OptimizeScenarioUseCase::new(workspace, detector, TierPolicy::default(), SilentProgressReporter)
    }

    fn request(apply: bool) -> OptimizeRequest {
        OptimizeRequest::new(ScenarioName::new("notes").unwrap(), apply)
    }

    fn find(
        response: &OptimizationResponse,
        kind: RecommendationKind,
    ) -> Vec<&OptimizationRecommendation> {
        response
            .recommendations
            .iter()
            .filter(|r| r.kind == kind)
            .collect()
    }

    #[test]
    fn test_recommendations_cover_every_kind() {
        let temp_dir = fixture();
        let response = optimizer(temp_dir.path()).execute(request(false)).unwrap();

        let add = find(&response, RecommendationKind::AddDeclaration);
        assert_eq!(add.len(), 1);
        assert_eq!(add[0].dependency, "redis");

        let disable = find(&response, RecommendationKind::DisableUnused);
        assert_eq!(disable.len(), 1);
        assert_eq!(disable[0].dependency, "qdrant");

        let swaps = find(&response, RecommendationKind::TierSwap);
        assert_eq!(swaps.len(), 1);
        assert_eq!(swaps[0].alternative.as_deref(), Some("sqlite"));
        assert_eq!(swaps[0].tier.as_deref(), Some("desktop"));

        assert!(response.applied.is_empty());
    }

    #[test]
    fn test_apply_declares_and_disables() {
        let temp_dir = fixture();
        let response = optimizer(temp_dir.path()).execute(request(true)).unwrap();

        assert_eq!(
            response.applied,
            vec!["add_declaration:resource:redis", "disable_unused:resource:qdrant"]
        );

        let written = fs::read_to_string(temp_dir.path().join("notes/.vrooli/service.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["resources"]["qdrant"]["enabled"], false);
        assert_eq!(value["resources"]["redis"]["required"], false);
        assert!(value["deployment"]["tiers"]["desktop"].is_object());
    }
}
