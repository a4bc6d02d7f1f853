use super::deployment::ResourceRequirements;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Typed view of a scenario's `service.json`.
///
/// This struct is only ever produced by parsing. Edits go through
/// [`super::ManifestDocument`], which keeps key order, and the typed view is
/// re-derived from the edited document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceInfo>,
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceDeclaration>,
    #[serde(default)]
    pub scenarios: BTreeMap<String, ScenarioDeclaration>,
    #[serde(default)]
    pub deployment: DeploymentConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDeclaration {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub initialization: Vec<InitializationStep>,
}

impl Default for ResourceDeclaration {
    fn default() -> Self {
        Self {
            resource_type: None,
            enabled: true,
            required: false,
            purpose: None,
            initialization: Vec::new(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// Initialization entries appear both as bare paths and as `{file, type}` objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitializationStep {
    Path(String),
    Step {
        #[serde(default)]
        file: Option<String>,
        #[serde(rename = "type", default)]
        kind: Option<String>,
    },
}

impl InitializationStep {
    pub fn file(&self) -> Option<&str> {
        match self {
            InitializationStep::Path(path) => Some(path.as_str()),
            InitializationStep::Step { file, .. } => file.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDeclaration {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(
        rename = "versionRange",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub version_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Declaration order is kept: the first tier is the default bundle target
    #[serde(default)]
    pub tiers: IndexMap<String, TierDeclaration>,
    #[serde(default)]
    pub dependencies: DeploymentDependencies,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierDeclaration {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub fitness_score: Option<f64>,
    #[serde(default)]
    pub adaptations: Vec<String>,
}

impl TierDeclaration {
    /// A tier counts as supported unless its status explicitly says otherwise
    pub fn is_supported(&self) -> bool {
        !matches!(
            self.status.as_deref().map(str::to_lowercase).as_deref(),
            Some("unsupported" | "not_supported" | "blocked")
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentDependencies {
    #[serde(default)]
    pub resources: BTreeMap<String, DependencyDeploymentMetadata>,
    #[serde(default)]
    pub scenarios: BTreeMap<String, DependencyDeploymentMetadata>,
}

/// Per-dependency deployment facts declared by the depending scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyDeploymentMetadata {
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub footprint: Option<ResourceRequirements>,
    #[serde(default)]
    pub platform_support: IndexMap<String, PlatformSupport>,
    #[serde(default)]
    pub swappable_with: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformSupport {
    #[serde(default)]
    pub supported: Option<bool>,
    #[serde(default)]
    pub fitness_score: Option<f64>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

impl ServiceManifest {
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Resources that are not explicitly disabled
    pub fn enabled_resources(&self) -> impl Iterator<Item = (&String, &ResourceDeclaration)> {
        self.resources.iter().filter(|(_, decl)| decl.enabled)
    }

    pub fn resource_metadata(&self, name: &str) -> Option<&DependencyDeploymentMetadata> {
        self.deployment.dependencies.resources.get(name)
    }

    pub fn scenario_metadata(&self, name: &str) -> Option<&DependencyDeploymentMetadata> {
        self.deployment.dependencies.scenarios.get(name)
    }

    /// Declared tier names, in declaration order
    pub fn tier_names(&self) -> Vec<String> {
        self.deployment.tiers.keys().cloned().collect()
    }

    /// Shared workflows referenced by initialization steps of enabled
    /// resources, with the owning resource's `required` flag
    pub fn shared_workflows(&self) -> BTreeMap<String, bool> {
        let mut workflows = BTreeMap::new();
        for (_, declaration) in self.enabled_resources() {
            for step in &declaration.initialization {
                if let Some(name) = step.file().and_then(shared_workflow_name) {
                    let required = workflows.entry(name).or_insert(false);
                    *required |= declaration.required;
                }
            }
        }
        workflows
    }
}

/// `.../shared-workflows/<name>[.json]` or `.../n8n/shared/<name>.json`
fn shared_workflow_name(path: &str) -> Option<String> {
    let (_, rest) = path
        .split_once("shared-workflows/")
        .or_else(|| path.split_once("n8n/shared/"))?;
    let file = rest.split('/').next()?;
    let name = file.strip_suffix(".json").unwrap_or(file);
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "service": {"name": "research-assistant", "version": "1.2.0"},
        "resources": {
            "postgres": {
                "type": "postgres",
                "enabled": true,
                "required": true,
                "purpose": "Stores research notes",
                "initialization": [
                    {"file": "initialization/postgres/schema.sql", "type": "sql"},
                    "initialization/postgres/seed.sql"
                ]
            },
            "redis": {"type": "redis", "enabled": false}
        },
        "scenarios": {
            "document-manager": {"required": true, "versionRange": ">=1.0.0"}
        },
        "deployment": {
            "tiers": {"desktop": {"status": "limited", "fitness_score": 0.6}},
            "dependencies": {
                "resources": {
                    "postgres": {
                        "resource_type": "database",
                        "footprint": {"ram_mb": 256, "disk_mb": 1024, "cpu_cores": 0.5},
                        "platform_support": {
                            "desktop": {"supported": true, "fitness_score": 0.5, "alternatives": ["sqlite"]}
                        },
                        "swappable_with": ["mysql"]
                    }
                }
            }
        }
    }"#;

    #[test]
    fn test_shared_workflows_from_initialization() {
        let manifest = ServiceManifest::from_json(
            r#"{"resources": {"n8n": {"type": "n8n", "required": true, "initialization": [
                "initialization/n8n/shared/ollama.json",
                {"file": "initialization/n8n/process-notes.json", "type": "workflow"}
            ]}}}"#,
        )
        .unwrap();
        let workflows = manifest.shared_workflows();
        assert_eq!(workflows.len(), 1);
        assert_eq!(workflows.get("ollama"), Some(&true));
    }

    #[test]
    fn test_parse_full_manifest() {
        let manifest = ServiceManifest::from_json(MANIFEST).unwrap();

        let postgres = &manifest.resources["postgres"];
        assert!(postgres.required);
        assert_eq!(postgres.resource_type.as_deref(), Some("postgres"));
        assert_eq!(postgres.initialization.len(), 2);
        assert_eq!(
            postgres.initialization[0].file(),
            Some("initialization/postgres/schema.sql")
        );
        assert_eq!(
            postgres.initialization[1].file(),
            Some("initialization/postgres/seed.sql")
        );

        let scenario = &manifest.scenarios["document-manager"];
        assert!(scenario.required);
        assert_eq!(scenario.version_range.as_deref(), Some(">=1.0.0"));

        let metadata = manifest.resource_metadata("postgres").unwrap();
        let footprint = metadata.footprint.as_ref().unwrap();
        assert_eq!(footprint.ram_mb, 256);
        assert_eq!(metadata.platform_support["desktop"].fitness_score, Some(0.5));
        assert_eq!(metadata.swappable_with, vec!["mysql".to_string()]);
    }

    #[test]
    fn test_enabled_resources_skips_disabled() {
        let manifest = ServiceManifest::from_json(MANIFEST).unwrap();
        let names: Vec<&String> = manifest.enabled_resources().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["postgres"]);
    }

    #[test]
    fn test_empty_manifest_defaults() {
        let manifest = ServiceManifest::from_json("{}").unwrap();
        assert!(manifest.resources.is_empty());
        assert!(manifest.scenarios.is_empty());
        assert!(manifest.deployment.tiers.is_empty());
    }

    #[test]
    fn test_resource_enabled_defaults_to_true() {
        let manifest =
            ServiceManifest::from_json(r#"{"resources": {"ollama": {"type": "ollama"}}}"#).unwrap();
        assert!(manifest.resources["ollama"].enabled);
        assert!(!manifest.resources["ollama"].required);
    }

    #[test]
    fn test_tier_declaration_support() {
        let limited = TierDeclaration {
            status: Some("limited".to_string()),
            ..Default::default()
        };
        let blocked = TierDeclaration {
            status: Some("Unsupported".to_string()),
            ..Default::default()
        };
        assert!(limited.is_supported());
        assert!(!blocked.is_supported());
        assert!(TierDeclaration::default().is_supported());
    }
}
