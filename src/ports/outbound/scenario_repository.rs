use crate::dependency_analysis::domain::{ManifestDocument, ServiceManifest};
use crate::shared::Result;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// ScenarioRepository port for locating scenarios and their manifests
///
/// This port abstracts the workspace layout: where a scenario lives and how
/// its declared manifest is read and written.
pub trait ScenarioRepository {
    /// Lists every scenario that has a manifest, sorted by name
    fn list_scenarios(&self) -> Result<Vec<String>>;

    /// Resolves a scenario name to its root directory
    ///
    /// # Errors
    /// Returns `AnalyzerError::ScenarioNotFound` if the scenario has no manifest
    fn scenario_path(&self, name: &str) -> Result<PathBuf>;

    /// Loads and parses the scenario's declared manifest
    ///
    /// # Errors
    /// Returns an error if:
    /// - The scenario has no manifest (`ScenarioNotFound`)
    /// - The manifest is not valid JSON (`ManifestParseError`)
    fn load_manifest(&self, name: &str) -> Result<ServiceManifest>;

    /// Last modification time of the manifest, if it can be determined
    fn manifest_modified_at(&self, name: &str) -> Result<Option<DateTime<Utc>>>;

    /// Loads the manifest as an order-preserving editable document
    fn load_document(&self, name: &str) -> Result<ManifestDocument>;

    /// Writes an edited manifest back atomically
    fn save_document(&self, name: &str, document: &ManifestDocument) -> Result<()>;
}

impl<T: ScenarioRepository + ?Sized> ScenarioRepository for std::sync::Arc<T> {
    fn list_scenarios(&self) -> Result<Vec<String>> {
        (**self).list_scenarios()
    }

    fn scenario_path(&self, name: &str) -> Result<PathBuf> {
        (**self).scenario_path(name)
    }

    fn load_manifest(&self, name: &str) -> Result<ServiceManifest> {
        (**self).load_manifest(name)
    }

    fn manifest_modified_at(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        (**self).manifest_modified_at(name)
    }

    fn load_document(&self, name: &str) -> Result<ManifestDocument> {
        (**self).load_document(name)
    }

    fn save_document(&self, name: &str, document: &ManifestDocument) -> Result<()> {
        (**self).save_document(name, document)
    }
}
