use crate::dependency_analysis::domain::{ManifestDocument, ServiceManifest};
use crate::ports::outbound::{CatalogSource, ScenarioRepository};
use crate::shared::Result;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// CachingScenarioWorkspace wraps a ScenarioRepository and memoizes parsed manifests.
///
/// Deployment tree builds load the same scenario once per path that reaches
/// it; with the cache each manifest is parsed once per analysis. Only
/// successful loads are cached. Saving a document through this wrapper
/// evicts the scenario so the next load sees the new content.
pub struct CachingScenarioWorkspace<W> {
    inner: W,
    manifests: Arc<DashMap<String, ServiceManifest>>,
}

impl<W> CachingScenarioWorkspace<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            manifests: Arc::new(DashMap::new()),
        }
    }

    pub fn inner(&self) -> &W {
        &self.inner
    }

    /// Drops every cached manifest
    pub fn clear(&self) {
        self.manifests.clear();
    }

    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.manifests.len()
    }
}

impl<W: ScenarioRepository> ScenarioRepository for CachingScenarioWorkspace<W> {
    fn list_scenarios(&self) -> Result<Vec<String>> {
        self.inner.list_scenarios()
    }

    fn scenario_path(&self, name: &str) -> Result<PathBuf> {
        self.inner.scenario_path(name)
    }

    fn load_manifest(&self, name: &str) -> Result<ServiceManifest> {
        if let Some(cached) = self.manifests.get(name) {
            return Ok(cached.clone());
        }

        let manifest = self.inner.load_manifest(name)?;
        self.manifests.insert(name.to_string(), manifest.clone());
        Ok(manifest)
    }

    fn manifest_modified_at(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        self.inner.manifest_modified_at(name)
    }

    fn load_document(&self, name: &str) -> Result<ManifestDocument> {
        self.inner.load_document(name)
    }

    fn save_document(&self, name: &str, document: &ManifestDocument) -> Result<()> {
        let result = self.inner.save_document(name, document);
        self.manifests.remove(name);
        result
    }
}

impl<W: CatalogSource> CatalogSource for CachingScenarioWorkspace<W> {
    fn known_scenarios(&self) -> Result<Vec<String>> {
        self.inner.known_scenarios()
    }

    fn known_resources(&self) -> Result<Vec<String>> {
        self.inner.known_resources()
    }

    fn known_shared_workflows(&self) -> Result<Vec<String>> {
        self.inner.known_shared_workflows()
    }
}
