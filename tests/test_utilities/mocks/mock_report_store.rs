use scenario_deps::dependency_analysis::domain::{BundleSkeleton, DeploymentAnalysisReport};
use scenario_deps::prelude::*;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Mock DeploymentReportStore holding reports and bundles in memory
#[derive(Default)]
pub struct MockReportStore {
    reports: Mutex<BTreeMap<String, DeploymentAnalysisReport>>,
    bundles: Mutex<Vec<BundleSkeleton>>,
    fail_saves: bool,
}

impl MockReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose report and bundle writes always fail
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn saved_bundles(&self) -> Vec<BundleSkeleton> {
        self.bundles.lock().unwrap().clone()
    }
}

impl DeploymentReportStore for MockReportStore {
    fn load_report(&self, scenario: &str) -> Result<Option<DeploymentAnalysisReport>> {
        Ok(self.reports.lock().unwrap().get(scenario).cloned())
    }

    fn save_report(&self, report: &DeploymentAnalysisReport) -> Result<PathBuf> {
        if self.fail_saves {
            anyhow::bail!("Mock report store error");
        }
        self.reports
            .lock()
            .unwrap()
            .insert(report.scenario.clone(), report.clone());
        Ok(PathBuf::from(format!("mock/{}/deployment-report.json", report.scenario)))
    }

    fn save_bundle(&self, skeleton: &BundleSkeleton) -> Result<PathBuf> {
        if self.fail_saves {
            anyhow::bail!("Mock report store error");
        }
        self.bundles.lock().unwrap().push(skeleton.clone());
        Ok(PathBuf::from(format!("mock/{}/bundle.json", skeleton.scenario)))
    }
}
