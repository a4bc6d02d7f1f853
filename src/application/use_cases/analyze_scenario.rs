use super::first_line;
use super::manifest_edits::declare_detected;
use crate::application::dto::{
    AnalysisResponse, AnalyzeRequest, BatchAnalysisResponse, ScenarioAnalysisSummary,
    ScenarioFailure,
};
use crate::dependency_analysis::domain::{
    DependencyDiff, DependencyType, DiffDetail, ScenarioDependency,
};
use crate::dependency_analysis::services::{
    diff_by_type, extract_declared, merge, DependencyDetector,
};
use crate::ports::outbound::{CatalogSource, DependencyStore, ProgressReporter, ScenarioRepository};
use crate::shared::Result;
use tracing::{info, warn};

/// AnalyzeScenarioUseCase - scan, reconcile and persist one scenario
///
/// Detected dependencies are diffed against the manifest per dependency
/// type, merged into the scenario's edge set and written to the store.
/// A store failure is logged and reported as `persisted: false`; it never
/// discards the analysis.
///
/// # Type Parameters
/// * `R` - ScenarioRepository implementation
/// * `C` - CatalogSource backing the detector
/// * `S` - DependencyStore implementation
/// * `P` - ProgressReporter implementation
pub struct AnalyzeScenarioUseCase<R, C: CatalogSource, S, P> {
    repository: R,
    detector: DependencyDetector<C>,
    store: S,
    progress_reporter: P,
}

impl<R, C, S, P> AnalyzeScenarioUseCase<R, C, S, P>
where
    R: ScenarioRepository,
    C: CatalogSource,
    S: DependencyStore,
    P: ProgressReporter,
{
    pub fn new(repository: R, detector: DependencyDetector<C>, store: S, progress_reporter: P) -> Self {
        Self {
            repository,
            detector,
            store,
            progress_reporter,
        }
    }

    pub fn detector(&self) -> &DependencyDetector<C> {
        &self.detector
    }

    /// Analyzes one scenario, optionally declaring what the scan found
    ///
    /// # Errors
    /// Returns an error if the scenario is unknown, its manifest cannot be
    /// parsed, or `apply` was requested and the manifest cannot be rewritten.
    pub fn execute(&self, request: AnalyzeRequest) -> Result<AnalysisResponse> {
        let scenario = request.scenario.as_str();
        self.progress_reporter
            .report(&format!("🔍 Scanning scenario '{}'...", scenario));

        let mut response = self.analyze(scenario)?;

        self.progress_reporter.report(&format!(
            "✅ Found {} dependency(ies) in {} file(s)",
            response.scan.dependencies.len(),
            response.scan.files_scanned
        ));

        if request.apply {
            response.applied =
                self.apply_missing(scenario, &response.resources, &response.scenarios)?;
        }

        Ok(response)
    }

    /// Analyzes every scenario in the workspace, one after another
    ///
    /// A scenario that fails is recorded in `failures`; the batch goes on.
    ///
    /// # Errors
    /// Returns an error only if the scenario list itself cannot be read.
    pub fn analyze_all(&self) -> Result<BatchAnalysisResponse> {
        let scenarios = self.repository.list_scenarios()?;
        let total = scenarios.len();
        self.progress_reporter
            .report(&format!("🔍 Analyzing {} scenario(s)...", total));

        let mut batch = BatchAnalysisResponse::default();
        for (index, scenario) in scenarios.iter().enumerate() {
            self.progress_reporter
                .report_progress(index + 1, total, Some(scenario.as_str()));

            match self.analyze(scenario) {
                Ok(response) => batch.analyzed.push(ScenarioAnalysisSummary::from(&response)),
                Err(e) => {
                    warn!(scenario = %scenario, error = %e, "scenario analysis failed");
                    let error = first_line(&e.to_string());
                    self.progress_reporter
                        .report_error(&format!("{}: {}", scenario, error));
                    batch.failures.push(ScenarioFailure {
                        scenario: scenario.clone(),
                        error,
                    });
                }
            }
        }

        self.progress_reporter.report_completion(&format!(
            "✅ Analyzed {} scenario(s), {} failed",
            batch.analyzed.len(),
            batch.failures.len()
        ));
        Ok(batch)
    }

    fn analyze(&self, scenario: &str) -> Result<AnalysisResponse> {
        let root = self.repository.scenario_path(scenario)?;
        let manifest = self.repository.load_manifest(scenario)?;

        let scan = self.detector.scan(scenario, &root, &manifest);
        let declared = extract_declared(scenario, &manifest);

        let resources = diff_by_type(&declared, &scan.dependencies, DependencyType::Resource);
        let scenarios = diff_by_type(&declared, &scan.dependencies, DependencyType::Scenario);
        let shared_workflows =
            diff_by_type(&declared, &scan.dependencies, DependencyType::SharedWorkflow);

        let dependencies = merge(scenario, declared, &scan.dependencies);
        let persisted = self.persist(scenario, &dependencies);

        info!(
            scenario,
            detected = scan.dependencies.len(),
            missing = resources.missing.len() + scenarios.missing.len(),
            extra = resources.extra.len() + scenarios.extra.len(),
            persisted,
            "scenario analyzed"
        );

        Ok(AnalysisResponse {
            scenario: scenario.to_string(),
            scan,
            resources,
            scenarios,
            shared_workflows,
            dependencies,
            persisted,
            applied: Vec::new(),
        })
    }

    fn persist(&self, scenario: &str, dependencies: &[ScenarioDependency]) -> bool {
        match self.store.replace_scenario_dependencies(scenario, dependencies) {
            Ok(()) => true,
            Err(e) => {
                warn!(scenario, error = %e, "failed to persist dependency edges");
                self.progress_reporter.report_error(&format!(
                    "Could not persist dependencies of '{}': {}",
                    scenario,
                    first_line(&e.to_string())
                ));
                false
            }
        }
    }

    /// Declares missing resources and scenarios in the manifest
    fn apply_missing(
        &self,
        scenario: &str,
        resources: &DependencyDiff<DiffDetail>,
        scenarios: &DependencyDiff<DiffDetail>,
    ) -> Result<Vec<String>> {
        let mut document = self.repository.load_document(scenario)?;
        let mut applied = Vec::new();

        for (dependency_type, diff) in [
            (DependencyType::Resource, resources),
            (DependencyType::Scenario, scenarios),
        ] {
            for entry in &diff.missing {
                if declare_detected(
                    &mut document,
                    dependency_type,
                    &entry.name,
                    entry.details.resource_type.as_deref(),
                )? {
                    applied.push(format!("{}:{}", dependency_type, entry.name));
                }
            }
        }

        if !applied.is_empty() {
            self.repository.save_document(scenario, &document)?;
            self.detector.refresh_catalogs();
            self.progress_reporter.report(&format!(
                "📝 Declared {} dependency(ies) in '{}'",
                applied.len(),
                scenario
            ));
        }
        Ok(applied)
    }
}
