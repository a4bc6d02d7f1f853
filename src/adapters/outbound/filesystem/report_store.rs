use super::atomic::write_atomic;
use crate::dependency_analysis::domain::{BundleSkeleton, DeploymentAnalysisReport, ScenarioName};
use crate::dependency_analysis::services::BundleManifestBuilder;
use crate::ports::outbound::DeploymentReportStore;
use crate::shared::error::AnalyzerError;
use crate::shared::security::read_document;
use crate::shared::Result;
use std::path::PathBuf;
use tracing::debug;

pub const REPORT_RELATIVE_PATH: &str = ".vrooli/deployment-report.json";
pub const BUNDLE_RELATIVE_PATH: &str = ".vrooli/bundle.json";

/// FileSystemReportStore adapter keeping deployment artifacts next to each manifest
///
/// Reports land in `<root>/<scenario>/.vrooli/deployment-report.json` and
/// bundle skeletons in `<root>/<scenario>/.vrooli/bundle.json`.
pub struct FileSystemReportStore {
    scenarios_root: PathBuf,
}

impl FileSystemReportStore {
    pub fn new(scenarios_root: impl Into<PathBuf>) -> Self {
        Self {
            scenarios_root: scenarios_root.into(),
        }
    }

    fn artifact_path(&self, scenario: &str, relative: &str) -> Result<PathBuf> {
        let name = ScenarioName::new(scenario)?;
        Ok(self.scenarios_root.join(name.as_str()).join(relative))
    }
}

impl DeploymentReportStore for FileSystemReportStore {
    fn load_report(&self, scenario: &str) -> Result<Option<DeploymentAnalysisReport>> {
        let path = self.artifact_path(scenario, REPORT_RELATIVE_PATH)?;
        if !path.exists() {
            debug!(scenario, "no cached deployment report");
            return Ok(None);
        }

        let content = read_document(&path, "deployment report")?;
        let report = serde_json::from_str(&content).map_err(|e| AnalyzerError::FileReadError {
            path: path.clone(),
            details: format!("Cached deployment report is not valid: {}", e),
        })?;
        Ok(Some(report))
    }

    fn save_report(&self, report: &DeploymentAnalysisReport) -> Result<PathBuf> {
        let path = self.artifact_path(&report.scenario, REPORT_RELATIVE_PATH)?;
        let mut content = serde_json::to_string_pretty(report)?;
        content.push('\n');
        write_atomic(&path, &content)?;
        Ok(path)
    }

    /// Refuses to write a skeleton that fails schema validation
    fn save_bundle(&self, skeleton: &BundleSkeleton) -> Result<PathBuf> {
        BundleManifestBuilder::validate(skeleton)?;

        let path = self.artifact_path(&skeleton.scenario, BUNDLE_RELATIVE_PATH)?;
        let mut content = serde_json::to_string_pretty(skeleton)?;
        content.push('\n');
        write_atomic(&path, &content)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency_analysis::domain::{BundleManifest, HealthCheck, SkeletonService};
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    fn report(scenario: &str) -> DeploymentAnalysisReport {
        DeploymentAnalysisReport {
            scenario: scenario.to_string(),
            generated_at: Utc::now(),
            tiers: vec!["desktop".to_string()],
            dependencies: Vec::new(),
            aggregates: BTreeMap::new(),
            secrets: Vec::new(),
            swaps: Vec::new(),
            bundle_manifest: BundleManifest::default(),
            blocking_threshold: 0.75,
            source_scenarios: vec![scenario.to_string()],
            missing_scenarios: Vec::new(),
        }
    }

    fn skeleton(services: Vec<SkeletonService>) -> BundleSkeleton {
        BundleSkeleton {
            schema_version: "1.0".to_string(),
            scenario: "notes".to_string(),
            target_tier: "desktop".to_string(),
            services,
            swaps: Vec::new(),
        }
    }

    #[test]
    fn test_missing_report_is_cache_miss() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemReportStore::new(temp_dir.path());
        assert!(store.load_report("notes").unwrap().is_none());
    }

    #[test]
    fn test_saved_report_loads_back() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemReportStore::new(temp_dir.path());

        let path = store.save_report(&report("notes")).unwrap();
        assert!(path.ends_with(".vrooli/deployment-report.json"));

        let loaded = store.load_report("notes").unwrap().unwrap();
        assert_eq!(loaded.scenario, "notes");
        assert_eq!(loaded.tiers, vec!["desktop"]);
    }

    #[test]
    fn test_corrupt_report_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("notes/.vrooli");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("deployment-report.json"), "{ truncated").unwrap();

        let store = FileSystemReportStore::new(temp_dir.path());
        assert!(store.load_report("notes").is_err());
    }

    #[test]
    fn test_invalid_bundle_is_not_written() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemReportStore::new(temp_dir.path());

        let result = store.save_bundle(&skeleton(Vec::new()));

        assert!(result.is_err());
        assert!(!temp_dir.path().join("notes/.vrooli/bundle.json").exists());
    }

    #[test]
    fn test_valid_bundle_is_written() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemReportStore::new(temp_dir.path());
        let service = SkeletonService {
            id: "redis".to_string(),
            kind: "resource".to_string(),
            entry: None,
            health: HealthCheck {
                check_type: "command".to_string(),
                path: None,
                port_env: None,
                command: Some("resource-redis status".to_string()),
                interval_secs: 60,
            },
            depends_on: Vec::new(),
        };

        let path = store.save_bundle(&skeleton(vec![service])).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written["services"][0]["id"], "redis");
    }
}
