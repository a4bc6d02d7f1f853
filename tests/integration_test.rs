/// Integration tests for the application layer
mod test_utilities;

use chrono::{Duration, Utc};
use scenario_deps::dependency_analysis::domain::{CycleSeverity, ImpactSeverity};
use scenario_deps::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use test_utilities::mocks::*;

const NOTES_MANIFEST: &str = r#"{
  "resources": {
    "postgres": {"type": "database", "enabled": true, "required": true}
  },
  "scenarios": {}
}"#;

/// Lays out one source tree per scenario so the detector has files to walk
fn source_tree(scenarios: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (name, source) in scenarios {
        let api = temp_dir.path().join(name).join("api");
        fs::create_dir_all(&api).unwrap();
        fs::write(api.join("main.go"), source).unwrap();
    }
    temp_dir
}

fn analyzer<S: DependencyStore>(
    repository: &Arc<MockScenarioRepository>,
    store: S,
    progress: MockProgressReporter,
) -> AnalyzeScenarioUseCase<Arc<MockScenarioRepository>, Arc<MockScenarioRepository>, S, MockProgressReporter>
{
    AnalyzeScenarioUseCase::new(
        Arc::clone(repository),
        DependencyDetector::new(Arc::clone(repository)).unwrap(),
        store,
        progress,
    )
}

fn edge(scenario: &str, dependency_type: DependencyType, name: &str, required: bool) -> ScenarioDependency {
    ScenarioDependency::new(scenario, dependency_type, name, required)
}

// ============================================================
// Analysis
// ============================================================

#[test]
fn test_analyze_reports_missing_and_extra() {
    let temp_dir = source_tree(&[
        ("notes", "package main\nconst url = \"redis://localhost:6379\"\n// auth-cli status\n"),
        ("auth", "package main\n"),
    ]);
    let repository = Arc::new(
        MockScenarioRepository::new(temp_dir.path())
            .with_scenario("notes", NOTES_MANIFEST)
            .with_scenario("auth", "{}"),
    );
    let store = Arc::new(MockDependencyStore::new());

    let response = analyzer(&repository, Arc::clone(&store), MockProgressReporter::new())
        .execute(AnalyzeRequest::new(ScenarioName::new("notes").unwrap(), false))
        .unwrap();

    let missing: Vec<_> = response.resources.missing.iter().map(|e| e.name.as_str()).collect();
    let extra: Vec<_> = response.resources.extra.iter().map(|e| e.name.as_str()).collect();
    let missing_scenarios: Vec<_> = response.scenarios.missing.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(missing, vec!["redis"]);
    assert_eq!(extra, vec!["postgres"]);
    assert_eq!(missing_scenarios, vec!["auth"]);

    assert!(response.persisted);
    assert!(response.has_drift());
    assert_eq!(store.scenario_dependencies("notes").unwrap().len(), response.dependencies.len());
}

#[test]
fn test_analyze_survives_store_failure() {
    let temp_dir = source_tree(&[("notes", "url := \"redis://cache\"\n")]);
    let repository =
        Arc::new(MockScenarioRepository::new(temp_dir.path()).with_scenario("notes", NOTES_MANIFEST));
    let progress = MockProgressReporter::new();

    let response = analyzer(&repository, MockDependencyStore::failing(), progress.clone())
        .execute(AnalyzeRequest::new(ScenarioName::new("notes").unwrap(), false))
        .unwrap();

    assert!(!response.persisted);
    assert!(!response.dependencies.is_empty());
    assert!(progress
        .get_messages()
        .iter()
        .any(|m| m.starts_with("Error: Could not persist dependencies of 'notes'")));
}

#[test]
fn test_analyze_apply_declares_missing_dependencies() {
    let temp_dir = source_tree(&[
        ("notes", "url := \"redis://cache\"\npostgres_url := \"postgres://db\"\nexec(\"auth-cli login\")\n"),
        ("auth", "package main\n"),
    ]);
    let repository = Arc::new(
        MockScenarioRepository::new(temp_dir.path())
            .with_scenario("notes", NOTES_MANIFEST)
            .with_scenario("auth", "{}"),
    );

    let response = analyzer(&repository, MockDependencyStore::new(), MockProgressReporter::new())
        .execute(AnalyzeRequest::new(ScenarioName::new("notes").unwrap(), true))
        .unwrap();

    assert_eq!(response.applied, vec!["resource:redis", "scenario:auth"]);

    let manifest = ServiceManifest::from_json(&repository.manifest_text("notes").unwrap()).unwrap();
    assert!(manifest.resources.contains_key("redis"));
    assert!(manifest.scenarios.contains_key("auth"));
    // Existing declarations keep their position
    let text = repository.manifest_text("notes").unwrap();
    assert!(text.find("postgres").unwrap() < text.find("redis").unwrap());
}

#[test]
fn test_analyze_all_records_failures_and_continues() {
    let temp_dir = source_tree(&[
        ("broken", "package main\n"),
        ("notes", "url := \"redis://cache\"\n"),
    ]);
    let repository = Arc::new(
        MockScenarioRepository::new(temp_dir.path())
            .with_scenario("broken", "{ not json")
            .with_scenario("notes", NOTES_MANIFEST),
    );
    let progress = MockProgressReporter::new();

    let batch = analyzer(&repository, MockDependencyStore::new(), progress.clone())
        .analyze_all()
        .unwrap();

    assert_eq!(batch.analyzed.len(), 1);
    assert_eq!(batch.analyzed[0].scenario, "notes");
    assert_eq!(batch.failures.len(), 1);
    assert_eq!(batch.failures[0].scenario, "broken");
    assert!(!batch.failures[0].error.contains('\n'));
    assert!(progress
        .get_messages()
        .contains(&"Progress: 2/2 - notes".to_string()));
}

// ============================================================
// Graph, cycles and impact
// ============================================================

#[test]
fn test_required_cycle_is_critical() {
    let store = MockDependencyStore::with_dependencies(vec![
        edge("a", DependencyType::Scenario, "b", true),
        edge("b", DependencyType::Scenario, "c", true),
        edge("c", DependencyType::Scenario, "a", true),
        edge("a", DependencyType::Resource, "postgres", true),
    ]);
    let catalog = NameCatalog::new(["a", "b", "c"], ["postgres"], Vec::<&str>::new());

    let report = DependencyGraphUseCase::new(
        store,
        catalog,
        ImpactThresholds::default(),
        SilentProgressReporter,
    )
    .cycles()
    .unwrap();

    assert!(report.has_cycles);
    assert_eq!(report.total_cycles, 1);
    assert_eq!(report.severity, CycleSeverity::Critical);
    assert_eq!(report.cycles[0].length, 3);
}

#[test]
fn test_five_required_dependents_are_critical() {
    let scenarios = ["alpha", "beta", "gamma", "delta", "epsilon"];
    let store = MockDependencyStore::with_dependencies(
        scenarios
            .iter()
            .map(|s| edge(s, DependencyType::Resource, "postgres", true))
            .collect(),
    );
    let catalog = NameCatalog::new(scenarios, ["postgres"], Vec::<&str>::new());

    let report = DependencyGraphUseCase::new(
        store,
        catalog,
        ImpactThresholds::default(),
        SilentProgressReporter,
    )
    .impact("postgres")
    .unwrap();

    assert_eq!(report.required_dependents, 5);
    assert_eq!(report.direct_dependents.len(), 5);
    assert_eq!(report.severity, ImpactSeverity::Critical);
}

#[test]
fn test_graph_contains_only_known_nodes() {
    let store = MockDependencyStore::with_dependencies(vec![
        edge("notes", DependencyType::Resource, "postgres", true),
        edge("notes", DependencyType::Scenario, "auth", false),
        edge("notes", DependencyType::Scenario, "retired", false),
    ]);
    let catalog = NameCatalog::new(["notes", "auth"], ["postgres"], Vec::<&str>::new());

    let graph = DependencyGraphUseCase::new(
        store,
        catalog,
        ImpactThresholds::default(),
        SilentProgressReporter,
    )
    .graph(GraphType::Combined)
    .unwrap();

    let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert!(ids.contains(&"scenario:auth"));
    assert!(!ids.contains(&"scenario:retired"));
    assert_eq!(graph.edges.len(), 2);
}

// ============================================================
// Deployment reports
// ============================================================

const SIZED_MANIFEST: &str = r#"{
  "resources": {
    "postgres": {"enabled": true, "required": true},
    "redis": {"enabled": true}
  },
  "deployment": {
    "tiers": {"desktop": {}},
    "dependencies": {
      "resources": {
        "postgres": {"footprint": {"ram_mb": 256}},
        "redis": {"footprint": {"ram_mb": 128}}
      }
    }
  }
}"#;

fn deployments<T: DeploymentReportStore>(
    repository: &Arc<MockScenarioRepository>,
    store: T,
    progress: MockProgressReporter,
) -> DeploymentReportUseCase<Arc<MockScenarioRepository>, T, MockProgressReporter> {
    DeploymentReportUseCase::new(Arc::clone(repository), store, TierPolicy::default(), progress)
}

fn notes() -> ScenarioName {
    ScenarioName::new("notes").unwrap()
}

#[test]
fn test_tier_requirements_add_up() {
    let repository =
        Arc::new(MockScenarioRepository::new(Path::new("/scenarios")).with_scenario("notes", SIZED_MANIFEST));

    let response = deployments(&repository, MockReportStore::new(), MockProgressReporter::new())
        .execute(DeploymentRequest::new(notes(), false))
        .unwrap();

    let desktop = &response.report.aggregates["desktop"];
    assert_eq!(desktop.dependency_count, 2);
    assert_eq!(desktop.estimated_requirements.ram_mb, 384);
}

#[test]
fn test_cached_report_goes_stale_when_manifest_changes() {
    let repository =
        Arc::new(MockScenarioRepository::new(Path::new("/scenarios")).with_scenario("notes", SIZED_MANIFEST));
    let use_case = deployments(&repository, MockReportStore::new(), MockProgressReporter::new());

    let first = use_case.execute(DeploymentRequest::new(notes(), false)).unwrap();
    assert!(!first.from_cache);

    let cached = use_case.execute(DeploymentRequest::new(notes(), false)).unwrap();
    assert!(cached.from_cache);
    assert_eq!(cached.report.generated_at, first.report.generated_at);

    repository.touch("notes", Utc::now() + Duration::hours(1));
    let rebuilt = use_case.execute(DeploymentRequest::new(notes(), false)).unwrap();
    assert!(!rebuilt.from_cache);
}

const APP_MANIFEST: &str = r#"{
  "scenarios": {"notes": {"required": true}},
  "deployment": {"tiers": {"desktop": {}}}
}"#;

fn app() -> ScenarioName {
    ScenarioName::new("app").unwrap()
}

#[test]
fn test_cached_report_goes_stale_when_child_manifest_changes() {
    let repository = Arc::new(
        MockScenarioRepository::new(Path::new("/scenarios"))
            .with_scenario("app", APP_MANIFEST)
            .with_scenario("notes", r#"{"resources": {"redis": {"enabled": true}}}"#),
    );
    let use_case = deployments(&repository, MockReportStore::new(), MockProgressReporter::new());

    let first = use_case.execute(DeploymentRequest::new(app(), false)).unwrap();
    assert_eq!(first.report.aggregates["desktop"].dependency_count, 2);
    assert_eq!(first.report.source_scenarios, vec!["app", "notes"]);

    repository.rewrite(
        "notes",
        r#"{"resources": {"redis": {"enabled": true}, "postgres": {"enabled": true}}}"#,
        Utc::now() + Duration::hours(1),
    );
    let second = use_case.execute(DeploymentRequest::new(app(), false)).unwrap();
    assert!(!second.from_cache);
    assert_eq!(second.report.aggregates["desktop"].dependency_count, 3);
}

#[test]
fn test_cached_report_goes_stale_when_missing_child_appears() {
    let repository =
        Arc::new(MockScenarioRepository::new(Path::new("/scenarios")).with_scenario("app", APP_MANIFEST));
    let use_case = deployments(&repository, MockReportStore::new(), MockProgressReporter::new());

    let first = use_case.execute(DeploymentRequest::new(app(), false)).unwrap();
    assert_eq!(first.report.missing_scenarios, vec!["notes"]);

    repository.rewrite(
        "notes",
        r#"{"resources": {"postgres": {"enabled": true}}}"#,
        Utc::now() - Duration::hours(1),
    );
    let second = use_case.execute(DeploymentRequest::new(app(), false)).unwrap();
    assert!(!second.from_cache);
    assert!(second.report.missing_scenarios.is_empty());
    assert_eq!(second.report.aggregates["desktop"].dependency_count, 2);
}

#[test]
fn test_cached_report_goes_stale_when_threshold_changes() {
    let repository =
        Arc::new(MockScenarioRepository::new(Path::new("/scenarios")).with_scenario("notes", SIZED_MANIFEST));
    let store = Arc::new(MockReportStore::new());

    let first = deployments(&repository, Arc::clone(&store), MockProgressReporter::new())
        .execute(DeploymentRequest::new(notes(), false))
        .unwrap();
    assert!(!first.from_cache);

    let stricter = DeploymentReportUseCase::new(
        Arc::clone(&repository),
        Arc::clone(&store),
        TierPolicy::with_threshold(0.95),
        MockProgressReporter::new(),
    );
    let second = stricter.execute(DeploymentRequest::new(notes(), false)).unwrap();
    assert!(!second.from_cache);
    assert_eq!(second.report.blocking_threshold, 0.95);

    let third = stricter.execute(DeploymentRequest::new(notes(), false)).unwrap();
    assert!(third.from_cache);
}

#[test]
fn test_report_save_failure_is_not_fatal() {
    let repository =
        Arc::new(MockScenarioRepository::new(Path::new("/scenarios")).with_scenario("notes", SIZED_MANIFEST));
    let progress = MockProgressReporter::new();

    let response = deployments(&repository, MockReportStore::failing(), progress.clone())
        .execute(DeploymentRequest::new(notes(), false))
        .unwrap();

    assert!(response.report_path.is_none());
    assert_eq!(progress.message_count(), 2);
    assert!(progress
        .get_messages()
        .iter()
        .any(|m| m.starts_with("Error: Could not cache deployment report")));
}

#[test]
fn test_shared_dependency_is_bundled_once() {
    let notes_manifest = r#"{
      "resources": {"postgres": {"enabled": true, "required": true}},
      "scenarios": {"auth": {"required": true}},
      "deployment": {
        "tiers": {"desktop": {}},
        "dependencies": {"resources": {"postgres": {"swappable_with": ["sqlite"]}}}
      }
    }"#;
    let auth_manifest = r#"{
      "resources": {"postgres": {"enabled": true, "required": true}},
      "deployment": {
        "dependencies": {
          "resources": {
            "postgres": {"platform_support": {"desktop": {"supported": false, "alternatives": ["mysql"]}}}
          }
        }
      }
    }"#;
    let repository = Arc::new(
        MockScenarioRepository::new(Path::new("/scenarios"))
            .with_scenario("notes", notes_manifest)
            .with_scenario("auth", auth_manifest),
    );

    let response = deployments(&repository, MockReportStore::new(), MockProgressReporter::new())
        .execute(DeploymentRequest::new(notes(), false))
        .unwrap();

    let manifest = &response.report.bundle_manifest;
    let postgres: Vec<_> = manifest
        .dependencies
        .iter()
        .filter(|d| d.name == "postgres")
        .collect();
    assert_eq!(postgres.len(), 1);
    assert_eq!(postgres[0].alternatives, vec!["sqlite", "mysql"]);

    let swap = manifest.swaps.iter().find(|s| s.from == "postgres").unwrap();
    assert_eq!(swap.to, "sqlite");
    assert_eq!(response.report.aggregates["desktop"].dependency_count, 2);
}

#[test]
fn test_bundle_defaults_to_first_tier_and_saves() {
    let repository =
        Arc::new(MockScenarioRepository::new(Path::new("/scenarios")).with_scenario("notes", SIZED_MANIFEST));
    let store = Arc::new(MockReportStore::new());
    let progress = MockProgressReporter::new();

    let response = deployments(&repository, Arc::clone(&store), progress.clone())
        .bundle(BundleRequest::new(notes(), None, true))
        .unwrap();

    assert_eq!(response.skeleton.target_tier, "desktop");
    assert!(response.written_to.is_some());
    assert_eq!(store.saved_bundles().len(), 1);
    assert!(progress
        .get_messages()
        .iter()
        .any(|m| m.starts_with("Completed: ✅ Bundle written to")));
}

// ============================================================
// Optimization
// ============================================================

#[test]
fn test_optimize_recommends_declaring_used_resource() {
    let temp_dir = source_tree(&[("notes", "url := \"redis://cache\"\n")]);
    let manifest = SIZED_MANIFEST.replace(
        r#""redis": {"enabled": true}"#,
        r#""qdrant": {"enabled": true, "required": false}"#,
    );
    let repository =
        Arc::new(MockScenarioRepository::new(temp_dir.path()).with_scenario("notes", &manifest));

    let use_case = OptimizeScenarioUseCase::new(
        Arc::clone(&repository),
        DependencyDetector::new(Arc::clone(&repository)).unwrap(),
        TierPolicy::default(),
        MockProgressReporter::new(),
    );
    let response = use_case
        .execute(OptimizeRequest::new(notes(), false))
        .unwrap();

    assert!(response.applied.is_empty());
    assert!(response
        .recommendations
        .iter()
        .any(|r| r.dependency == "redis" && r.kind.to_string() == "add_declaration"));
    assert!(response
        .recommendations
        .iter()
        .any(|r| r.dependency == "qdrant" && r.kind.to_string() == "disable_unused"));
}
