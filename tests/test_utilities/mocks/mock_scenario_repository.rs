use chrono::{DateTime, Utc};
use scenario_deps::dependency_analysis::domain::ManifestDocument;
use scenario_deps::prelude::*;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Mock ScenarioRepository keeping manifests in memory
///
/// Also serves as the CatalogSource: every registered scenario is known,
/// resources are postgres and redis.
pub struct MockScenarioRepository {
    root: PathBuf,
    manifests: Mutex<BTreeMap<String, String>>,
    modified_at: Mutex<BTreeMap<String, DateTime<Utc>>>,
    resources: Vec<String>,
}

impl MockScenarioRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            manifests: Mutex::new(BTreeMap::new()),
            modified_at: Mutex::new(BTreeMap::new()),
            resources: vec!["postgres".to_string(), "redis".to_string()],
        }
    }

    pub fn with_scenario(self, name: &str, manifest: &str) -> Self {
        self.manifests
            .lock()
            .unwrap()
            .insert(name.to_string(), manifest.to_string());
        self
    }

    pub fn touch(&self, name: &str, at: DateTime<Utc>) {
        self.modified_at.lock().unwrap().insert(name.to_string(), at);
    }

    /// Replaces (or adds) a manifest as if it had been edited at `at`
    pub fn rewrite(&self, name: &str, manifest: &str, at: DateTime<Utc>) {
        self.manifests
            .lock()
            .unwrap()
            .insert(name.to_string(), manifest.to_string());
        self.touch(name, at);
    }

    pub fn manifest_text(&self, name: &str) -> Option<String> {
        self.manifests.lock().unwrap().get(name).cloned()
    }

    fn text(&self, name: &str) -> Result<String> {
        self.manifest_text(name)
            .ok_or_else(|| anyhow::anyhow!("Scenario not found: {}", name))
    }
}

impl ScenarioRepository for MockScenarioRepository {
    fn list_scenarios(&self) -> Result<Vec<String>> {
        Ok(self.manifests.lock().unwrap().keys().cloned().collect())
    }

    fn scenario_path(&self, name: &str) -> Result<PathBuf> {
        self.text(name)?;
        Ok(self.root.join(name))
    }

    fn load_manifest(&self, name: &str) -> Result<ServiceManifest> {
        Ok(ServiceManifest::from_json(&self.text(name)?)?)
    }

    fn manifest_modified_at(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        self.text(name)?;
        Ok(self.modified_at.lock().unwrap().get(name).copied())
    }

    fn load_document(&self, name: &str) -> Result<ManifestDocument> {
        ManifestDocument::parse(&self.text(name)?)
    }

    fn save_document(&self, name: &str, document: &ManifestDocument) -> Result<()> {
        let content = document.to_pretty_string()?;
        self.manifests
            .lock()
            .unwrap()
            .insert(name.to_string(), content);
        Ok(())
    }
}

impl CatalogSource for MockScenarioRepository {
    fn known_scenarios(&self) -> Result<Vec<String>> {
        self.list_scenarios()
    }

    fn known_resources(&self) -> Result<Vec<String>> {
        Ok(self.resources.clone())
    }

    fn known_shared_workflows(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
