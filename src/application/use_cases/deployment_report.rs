use crate::application::dto::{BundleRequest, BundleResponse, DeploymentRequest, DeploymentResponse};
use crate::dependency_analysis::domain::DeploymentAnalysisReport;
use crate::dependency_analysis::policies::TierPolicy;
use crate::dependency_analysis::services::{BundleManifestBuilder, DeploymentTierAnalyzer};
use crate::ports::outbound::{DeploymentReportStore, ProgressReporter, ScenarioRepository};
use crate::shared::error::AnalyzerError;
use crate::shared::Result;
use tracing::{debug, info, warn};

/// DeploymentReportUseCase - cached per-tier deployment reports and bundle skeletons
///
/// A cached report is reused while it is at least as new as every manifest
/// that fed its tree and was built with the current tiers, blocking threshold
/// and artifact files. An unreadable cache is a miss, never a failure.
///
/// # Type Parameters
/// * `R` - ScenarioRepository implementation
/// * `T` - DeploymentReportStore implementation
/// * `P` - ProgressReporter implementation
pub struct DeploymentReportUseCase<R, T, P> {
    repository: R,
    report_store: T,
    policy: TierPolicy,
    progress_reporter: P,
}

impl<R, T, P> DeploymentReportUseCase<R, T, P>
where
    R: ScenarioRepository,
    T: DeploymentReportStore,
    P: ProgressReporter,
{
    pub fn new(repository: R, report_store: T, policy: TierPolicy, progress_reporter: P) -> Self {
        Self {
            repository,
            report_store,
            policy,
            progress_reporter,
        }
    }

    /// Returns the deployment report, rebuilding it when absent, stale or
    /// when `refresh` is set. A rebuilt report is written back; a failed
    /// write is logged and leaves `report_path` empty.
    ///
    /// # Errors
    /// Returns an error if the scenario's own manifest cannot be loaded
    pub fn execute(&self, request: DeploymentRequest) -> Result<DeploymentResponse> {
        let scenario = request.scenario.as_str();

        if !request.refresh {
            if let Some(report) = self.fresh_cached_report(scenario)? {
                self.progress_reporter
                    .report(&format!("📦 Using cached deployment report for '{}'", scenario));
                return Ok(DeploymentResponse {
                    report,
                    from_cache: true,
                    report_path: None,
                });
            }
        }

        self.progress_reporter
            .report(&format!("🏗️  Analyzing deployment tiers of '{}'...", scenario));
        let report = DeploymentTierAnalyzer::new(&self.repository, &self.policy).analyze(scenario)?;

        let report_path = match self.report_store.save_report(&report) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(scenario, error = %e, "failed to cache deployment report");
                self.progress_reporter
                    .report_error(&format!("Could not cache deployment report: {}", e));
                None
            }
        };

        info!(
            scenario,
            tiers = report.tiers.len(),
            swaps = report.swaps.len(),
            "deployment report built"
        );
        Ok(DeploymentResponse {
            report,
            from_cache: false,
            report_path,
        })
    }

    /// Builds the bundle skeleton for one tier, writing it when asked.
    ///
    /// The tier defaults to the first analyzed tier.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The deployment report cannot be built
    /// - The tier was not analyzed for this scenario
    /// - The skeleton fails schema validation
    /// - `write` was requested and the skeleton cannot be written
    pub fn bundle(&self, request: BundleRequest) -> Result<BundleResponse> {
        let scenario = request.scenario.clone();
        let deployment = self.execute(DeploymentRequest::new(scenario.clone(), false))?;
        let report = &deployment.report;

        let tier = match request.tier {
            Some(tier) if report.tiers.contains(&tier) => tier,
            Some(tier) => {
                return Err(AnalyzerError::Validation {
                    message: format!(
                        "Tier '{}' is not analyzed for scenario '{}' (available: {})",
                        tier,
                        scenario,
                        report.tiers.join(", ")
                    ),
                }
                .into())
            }
            None => report.tiers.first().cloned().ok_or_else(|| AnalyzerError::Validation {
                message: format!("Scenario '{}' has no deployment tiers", scenario),
            })?,
        };

        self.progress_reporter
            .report(&format!("🧰 Building {} bundle for '{}'...", tier, scenario));
        let skeleton = BundleManifestBuilder::skeleton(
            scenario.as_str(),
            &tier,
            &report.bundle_manifest,
            &self.policy,
        )?;

        let written_to = if request.write {
            let path = self.report_store.save_bundle(&skeleton)?;
            self.progress_reporter
                .report_completion(&format!("✅ Bundle written to {}", path.display()));
            Some(path)
        } else {
            None
        };

        Ok(BundleResponse {
            skeleton,
            written_to,
        })
    }

    fn fresh_cached_report(&self, scenario: &str) -> Result<Option<DeploymentAnalysisReport>> {
        let cached = match self.report_store.load_report(scenario) {
            Ok(Some(report)) => report,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!(scenario, error = %e, "ignoring unreadable deployment report");
                return Ok(None);
            }
        };

        match self.staleness(scenario, &cached)? {
            Some(reason) => {
                debug!(scenario, reason, "cached deployment report is stale");
                Ok(None)
            }
            None => Ok(Some(cached)),
        }
    }

    /// Why `cached` can no longer stand for `scenario`, if it can't
    fn staleness(
        &self,
        scenario: &str,
        cached: &DeploymentAnalysisReport,
    ) -> Result<Option<&'static str>> {
        if cached.blocking_threshold != self.policy.blocking_threshold {
            return Ok(Some("blocking threshold changed"));
        }

        let manifest = self.repository.load_manifest(scenario)?;
        if self.policy.tiers_for(&manifest.tier_names()) != cached.tiers {
            return Ok(Some("analyzed tiers changed"));
        }

        let scenario_root = self.repository.scenario_path(scenario)?;
        let files = BundleManifestBuilder::candidate_files(&scenario_root, scenario);
        if files != cached.bundle_manifest.files {
            return Ok(Some("bundle artifacts changed"));
        }

        let sources = std::iter::once(scenario).chain(
            cached
                .source_scenarios
                .iter()
                .map(String::as_str)
                .filter(|name| *name != scenario),
        );
        for name in sources {
            // Unknown modification time: nothing says the cache is stale.
            match self.repository.manifest_modified_at(name) {
                Ok(Some(modified)) if modified > cached.generated_at => {
                    return Ok(Some("a source manifest is newer than the report"));
                }
                Ok(_) => {}
                Err(_) => return Ok(Some("a source manifest is gone")),
            }
        }

        if cached
            .missing_scenarios
            .iter()
            .any(|name| self.repository.manifest_modified_at(name).is_ok())
        {
            return Ok(Some("a missing dependency manifest appeared"));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::filesystem::{
        FileSystemReportStore, FileSystemScenarioWorkspace, WorkspaceLayout,
    };
    use crate::dependency_analysis::domain::ScenarioName;
    use crate::ports::outbound::SilentProgressReporter;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"{
  "resources": {"postgres": {"enabled": true, "required": true}},
  "deployment": {
    "tiers": {"desktop": {}, "server": {}},
    "dependencies": {
      "resources": {
        "postgres": {
          "platform_support": {
            "desktop": {"supported": false, "alternatives": ["sqlite"]},
            "server": {"supported": true, "fitness_score": 0.95}
          }
        }
      }
    }
  }
}"#;

    fn fixture() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("notes");
        fs::create_dir_all(dir.join(".vrooli")).unwrap();
        fs::create_dir_all(dir.join("api")).unwrap();
        fs::write(dir.join(".vrooli/service.json"), MANIFEST).unwrap();
        fs::write(dir.join("api/main.go"), "package main\n").unwrap();
        temp_dir
    }

    fn use_case(
        root: &Path,
    ) -> DeploymentReportUseCase<FileSystemScenarioWorkspace, FileSystemReportStore, SilentProgressReporter>
    {
        DeploymentReportUseCase::new(
            FileSystemScenarioWorkspace::new(WorkspaceLayout::new(root)).unwrap(),
            FileSystemReportStore::new(root),
            TierPolicy::default(),
            SilentProgressReporter,
        )
    }

    fn notes() -> ScenarioName {
        ScenarioName::new("notes").unwrap()
    }

    #[test]
    fn test_second_call_uses_cache() {
        let temp_dir = fixture();
        let deployments = use_case(temp_dir.path());

        let first = deployments.execute(DeploymentRequest::new(notes(), false)).unwrap();
        assert!(!first.from_cache);
        assert!(first.report_path.is_some());

        let second = deployments.execute(DeploymentRequest::new(notes(), false)).unwrap();
        assert!(second.from_cache);
        assert_eq!(second.report.tiers, first.report.tiers);
    }

    #[test]
    fn test_refresh_bypasses_cache() {
        let temp_dir = fixture();
        let deployments = use_case(temp_dir.path());
        deployments.execute(DeploymentRequest::new(notes(), false)).unwrap();

        let refreshed = deployments.execute(DeploymentRequest::new(notes(), true)).unwrap();
        assert!(!refreshed.from_cache);
    }

    #[test]
    fn test_corrupt_cache_is_rebuilt() {
        let temp_dir = fixture();
        fs::write(
            temp_dir.path().join("notes/.vrooli/deployment-report.json"),
            "{ truncated",
        )
        .unwrap();

        let response = use_case(temp_dir.path())
            .execute(DeploymentRequest::new(notes(), false))
            .unwrap();
        assert!(!response.from_cache);
    }

    #[test]
    fn test_bundle_swaps_blocking_resource() {
        let temp_dir = fixture();
        let response = use_case(temp_dir.path())
            .bundle(BundleRequest::new(notes(), Some("desktop".to_string()), true))
            .unwrap();

        assert_eq!(response.skeleton.target_tier, "desktop");
        assert_eq!(response.skeleton.swaps[0].from, "postgres");
        assert_eq!(response.skeleton.swaps[0].to, "sqlite");
        assert!(temp_dir.path().join("notes/.vrooli/bundle.json").exists());
    }

    #[test]
    fn test_bundle_rejects_unanalyzed_tier() {
        let temp_dir = fixture();
        let err = use_case(temp_dir.path())
            .bundle(BundleRequest::new(notes(), Some("mobile".to_string()), false))
            .unwrap_err();
        assert!(err.to_string().contains("not analyzed"));
    }
}
