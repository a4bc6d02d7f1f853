use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Kind of thing a scenario depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    Resource,
    Scenario,
    SharedWorkflow,
}

impl DependencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::Resource => "resource",
            DependencyType::Scenario => "scenario",
            DependencyType::SharedWorkflow => "shared_workflow",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DependencyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "resource" | "resources" => Ok(DependencyType::Resource),
            "scenario" | "scenarios" => Ok(DependencyType::Scenario),
            "shared_workflow" | "shared_workflows" | "workflow" => {
                Ok(DependencyType::SharedWorkflow)
            }
            _ => Err(format!(
                "Invalid dependency type: {}. Expected 'resource', 'scenario' or 'shared_workflow'",
                s
            )),
        }
    }
}

/// A persisted dependency edge of one scenario.
///
/// Identity is `(scenario_name, dependency_type, dependency_name)`; the `id`
/// only labels a particular scan's row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDependency {
    pub id: Uuid,
    pub scenario_name: String,
    pub dependency_type: DependencyType,
    pub dependency_name: String,
    pub required: bool,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub access_method: String,
    #[serde(default)]
    pub configuration: BTreeMap<String, serde_json::Value>,
    pub discovered_at: DateTime<Utc>,
    pub last_verified: DateTime<Utc>,
}

impl ScenarioDependency {
    pub fn new(
        scenario_name: impl Into<String>,
        dependency_type: DependencyType,
        dependency_name: impl Into<String>,
        required: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            scenario_name: scenario_name.into(),
            dependency_type,
            dependency_name: dependency_name.into(),
            required,
            purpose: String::new(),
            access_method: String::new(),
            configuration: BTreeMap::new(),
            discovered_at: now,
            last_verified: now,
        }
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    pub fn with_access_method(mut self, access_method: impl Into<String>) -> Self {
        self.access_method = access_method.into();
        self
    }

    pub fn key(&self) -> DependencyKey {
        DependencyKey::new(self.dependency_type, &self.dependency_name)
    }

    /// Edge weight used by the graph: required edges count double
    pub fn weight(&self) -> f64 {
        if self.required {
            2.0
        } else {
            1.0
        }
    }
}

/// `(type, name)` pair used to deduplicate dependencies
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyKey {
    pub dependency_type: DependencyType,
    pub name: String,
}

impl DependencyKey {
    pub fn new(dependency_type: DependencyType, name: &str) -> Self {
        Self {
            dependency_type,
            name: name.to_string(),
        }
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.dependency_type, self.name)
    }
}

/// How a dependency was found in the source tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// `vrooli scenario run|test|status <name>`
    ScenarioCommand,
    /// `<name>-cli` invocation
    CliInvocation,
    /// `resolveScenarioPortViaCLI(ctx, ID, ...)` resolved through the alias table
    PortResolution,
    /// `resource-<name>` command
    ResourceCommand,
    /// Connection string or env-var family signature
    Signature,
    /// Shared workflow path reference
    WorkflowReference,
    /// Declared resource with initialization files
    Initialization,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::ScenarioCommand => "scenario_command",
            DetectionMethod::CliInvocation => "cli_invocation",
            DetectionMethod::PortResolution => "port_resolution",
            DetectionMethod::ResourceCommand => "resource_command",
            DetectionMethod::Signature => "signature",
            DetectionMethod::WorkflowReference => "workflow_reference",
            DetectionMethod::Initialization => "initialization",
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One place a dependency was seen
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DetectionEvidence {
    /// Path relative to the scenario root, `/`-separated
    pub file: String,
    pub method: DetectionMethod,
    /// Name of the pattern (or initialization file) that matched
    pub pattern: String,
}

/// A dependency inferred from the source tree, merged across every match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedDependency {
    pub name: String,
    pub dependency_type: DependencyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub evidence: Vec<DetectionEvidence>,
}

impl DetectedDependency {
    pub fn new(name: impl Into<String>, dependency_type: DependencyType) -> Self {
        Self {
            name: name.into(),
            dependency_type,
            resource_type: None,
            evidence: Vec::new(),
        }
    }

    /// Adds evidence unless the exact same (file, method, pattern) is already recorded
    pub fn add_evidence(&mut self, evidence: DetectionEvidence) {
        if !self.evidence.contains(&evidence) {
            self.evidence.push(evidence);
        }
    }

    /// Distinct files this dependency was seen in, in first-seen order
    pub fn files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = Vec::new();
        for evidence in &self.evidence {
            if !files.contains(&evidence.file.as_str()) {
                files.push(&evidence.file);
            }
        }
        files
    }

    /// The method of the first evidence, used as access method when persisted
    pub fn primary_method(&self) -> Option<DetectionMethod> {
        self.evidence.first().map(|e| e.method)
    }
}
