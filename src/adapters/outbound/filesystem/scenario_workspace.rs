use super::atomic::write_atomic;
use crate::dependency_analysis::domain::{ManifestDocument, ScenarioName, ServiceManifest};
use crate::dependency_analysis::policies::{ResourceKnowledge, KNOWN_RESOURCE_NAMES};
use crate::ports::outbound::{CatalogSource, ScenarioRepository};
use crate::shared::error::AnalyzerError;
use crate::shared::security::read_document;
use crate::shared::Result;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Manifest location relative to a scenario directory
pub const MANIFEST_RELATIVE_PATH: &str = ".vrooli/service.json";

/// Where scenarios, resources and shared workflows live on disk
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceLayout {
    pub scenarios_root: PathBuf,
    /// One directory per installed resource
    pub resources_root: Option<PathBuf>,
    /// `*.json` workflow files shared between scenarios
    pub shared_workflows_root: Option<PathBuf>,
    /// Resource names to accept even though nothing on disk declares them
    pub extra_resources: Vec<String>,
}

impl WorkspaceLayout {
    pub fn new(scenarios_root: impl Into<PathBuf>) -> Self {
        Self {
            scenarios_root: scenarios_root.into(),
            resources_root: None,
            shared_workflows_root: None,
            extra_resources: Vec::new(),
        }
    }
}

/// FileSystemScenarioWorkspace adapter over a directory of scenarios
///
/// Implements `ScenarioRepository` (manifests at
/// `<root>/<name>/.vrooli/service.json`) and `CatalogSource` (names
/// discovered from the same tree).
pub struct FileSystemScenarioWorkspace {
    layout: WorkspaceLayout,
}

impl FileSystemScenarioWorkspace {
    /// Creates a workspace rooted at an existing directory
    ///
    /// # Errors
    /// Returns `AnalyzerError::InvalidWorkspacePath` if the scenarios root is
    /// missing, a symlink, or not a directory.
    pub fn new(layout: WorkspaceLayout) -> Result<Self> {
        validate_root(&layout.scenarios_root)?;
        Ok(Self { layout })
    }

    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    pub fn manifest_path(&self, name: &str) -> PathBuf {
        self.layout.scenarios_root.join(name).join(MANIFEST_RELATIVE_PATH)
    }

    /// Resolves a name to its manifest path, validating the name first
    fn existing_manifest(&self, name: &str) -> Result<PathBuf> {
        let name = ScenarioName::new(name)?;
        let path = self.manifest_path(name.as_str());
        if !path.is_file() {
            return Err(AnalyzerError::ScenarioNotFound {
                name: name.to_string(),
                path,
            }
            .into());
        }
        Ok(path)
    }

    fn read_manifest_text(&self, name: &str) -> Result<(PathBuf, String)> {
        let path = self.existing_manifest(name)?;
        let content = read_document(&path, "scenario manifest")?;
        Ok((path, content))
    }

    /// Directory names directly under `root` (dot directories excluded)
    fn child_directories(root: &Path) -> Vec<String> {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %root.display(), error = %e, "cannot list directory");
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| !name.starts_with('.'))
            .collect();
        names.sort();
        names
    }

    /// Parses every manifest, skipping the ones that fail
    fn manifests(&self) -> Vec<(String, ServiceManifest)> {
        let names = match self.list_scenarios() {
            Ok(names) => names,
            Err(e) => {
                warn!(error = %e, "cannot list scenarios");
                return Vec::new();
            }
        };

        names
            .into_iter()
            .filter_map(|name| match self.load_manifest(&name) {
                Ok(manifest) => Some((name, manifest)),
                Err(e) => {
                    debug!(scenario = %name, error = %e, "manifest skipped while building catalog");
                    None
                }
            })
            .collect()
    }
}

fn validate_root(path: &Path) -> Result<()> {
    let invalid = |reason: String| AnalyzerError::InvalidWorkspacePath {
        path: path.to_path_buf(),
        reason,
    };

    let metadata = fs::symlink_metadata(path)
        .map_err(|e| invalid(format!("Directory does not exist ({})", e)))?;
    if metadata.is_symlink() {
        return Err(invalid(
            "Security: scenarios root is a symbolic link. Symbolic links are not allowed.".to_string(),
        )
        .into());
    }
    if !metadata.is_dir() {
        return Err(invalid("Not a directory".to_string()).into());
    }
    Ok(())
}

impl ScenarioRepository for FileSystemScenarioWorkspace {
    fn list_scenarios(&self) -> Result<Vec<String>> {
        Ok(Self::child_directories(&self.layout.scenarios_root)
            .into_iter()
            .filter(|name| ScenarioName::new(name.as_str()).is_ok())
            .filter(|name| self.manifest_path(name).is_file())
            .collect())
    }

    fn scenario_path(&self, name: &str) -> Result<PathBuf> {
        self.existing_manifest(name)?;
        Ok(self.layout.scenarios_root.join(name))
    }

    fn load_manifest(&self, name: &str) -> Result<ServiceManifest> {
        let (path, content) = self.read_manifest_text(name)?;
        ServiceManifest::from_json(&content).map_err(|e| {
            AnalyzerError::ManifestParseError {
                path,
                details: e.to_string(),
            }
            .into()
        })
    }

    fn manifest_modified_at(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        let path = self.existing_manifest(name)?;
        Ok(fs::metadata(&path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from))
    }

    fn load_document(&self, name: &str) -> Result<ManifestDocument> {
        let (path, content) = self.read_manifest_text(name)?;
        ManifestDocument::parse(&content).map_err(|e| {
            AnalyzerError::ManifestParseError {
                path,
                details: e.to_string(),
            }
            .into()
        })
    }

    fn save_document(&self, name: &str, document: &ManifestDocument) -> Result<()> {
        let path = self.existing_manifest(name)?;
        write_atomic(&path, &document.to_pretty_string()?)
    }
}

impl CatalogSource for FileSystemScenarioWorkspace {
    fn known_scenarios(&self) -> Result<Vec<String>> {
        self.list_scenarios()
    }

    /// Static resource names, resource directories, names declared by any
    /// scenario and configured extras
    fn known_resources(&self) -> Result<Vec<String>> {
        let mut names: BTreeSet<String> =
            KNOWN_RESOURCE_NAMES.iter().map(|n| n.to_string()).collect();

        if let Some(root) = &self.layout.resources_root {
            names.extend(Self::child_directories(root));
        }
        for (_, manifest) in self.manifests() {
            names.extend(manifest.resources.keys().cloned());
        }
        names.extend(self.layout.extra_resources.iter().cloned());

        Ok(names
            .into_iter()
            .map(|n| ResourceKnowledge::canonical_name(&n))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect())
    }

    fn known_shared_workflows(&self) -> Result<Vec<String>> {
        let mut names = BTreeSet::new();

        if let Some(root) = &self.layout.shared_workflows_root {
            if let Ok(entries) = fs::read_dir(root) {
                for entry in entries.filter_map(|e| e.ok()) {
                    let path = entry.path();
                    if path.extension().and_then(|e| e.to_str()) == Some("json") {
                        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                            names.insert(stem.to_string());
                        }
                    }
                }
            }
        }
        for (_, manifest) in self.manifests() {
            names.extend(manifest.shared_workflows().into_keys());
        }

        Ok(names.into_iter().collect())
    }
}
