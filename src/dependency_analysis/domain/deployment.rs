use super::dependency::DependencyType;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::AddAssign;

use super::bundle::BundleManifest;

/// RAM / disk / CPU footprint of a dependency
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequirements {
    #[serde(default)]
    pub ram_mb: u64,
    #[serde(default)]
    pub disk_mb: u64,
    #[serde(default)]
    pub cpu_cores: f64,
}

impl ResourceRequirements {
    pub fn new(ram_mb: u64, disk_mb: u64, cpu_cores: f64) -> Self {
        Self {
            ram_mb,
            disk_mb,
            cpu_cores,
        }
    }

    /// Field-wise merge: each non-zero override field replaces the base field
    pub fn overridden_by(&self, over: Option<&ResourceRequirements>) -> ResourceRequirements {
        let Some(over) = over else {
            return *self;
        };
        ResourceRequirements {
            ram_mb: if over.ram_mb > 0 { over.ram_mb } else { self.ram_mb },
            disk_mb: if over.disk_mb > 0 {
                over.disk_mb
            } else {
                self.disk_mb
            },
            cpu_cores: if over.cpu_cores > 0.0 {
                over.cpu_cores
            } else {
                self.cpu_cores
            },
        }
    }

    pub fn is_zero(&self) -> bool {
        self.ram_mb == 0 && self.disk_mb == 0 && self.cpu_cores == 0.0
    }
}

impl AddAssign for ResourceRequirements {
    fn add_assign(&mut self, rhs: Self) {
        self.ram_mb += rhs.ram_mb;
        self.disk_mb += rhs.disk_mb;
        self.cpu_cores += rhs.cpu_cores;
    }
}

/// How well one dependency fits one tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierSupport {
    pub supported: bool,
    pub fitness_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

impl TierSupport {
    pub fn new(supported: bool, fitness_score: f64) -> Self {
        Self {
            supported,
            fitness_score: fitness_score.clamp(0.0, 1.0),
            reason: None,
            alternatives: Vec::new(),
        }
    }
}

/// A node of a scenario's deployment dependency tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentDependencyNode {
    pub name: String,
    #[serde(rename = "type")]
    pub dependency_type: DependencyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Base footprint of the dependency itself
    pub requirements: ResourceRequirements,
    /// Footprint declared on the edge by the depending scenario
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement_override: Option<ResourceRequirements>,
    /// In the order the manifest declared it
    #[serde(default)]
    pub tier_support: IndexMap<String, TierSupport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub swappable_with: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cycle_detected: bool,
    #[serde(default)]
    pub children: Vec<DeploymentDependencyNode>,
}

impl DeploymentDependencyNode {
    pub fn new(name: impl Into<String>, dependency_type: DependencyType) -> Self {
        Self {
            name: name.into(),
            dependency_type,
            resource_type: None,
            requirements: ResourceRequirements::default(),
            requirement_override: None,
            tier_support: IndexMap::new(),
            swappable_with: Vec::new(),
            cycle_detected: false,
            children: Vec::new(),
        }
    }

    /// Footprint used for aggregation
    pub fn effective_requirements(&self) -> ResourceRequirements {
        self.requirements
            .overridden_by(self.requirement_override.as_ref())
    }
}

/// Per-tier rollup over a whole dependency tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentTierAggregate {
    pub dependency_count: usize,
    pub estimated_requirements: ResourceRequirements,
    pub fitness_score: f64,
    pub blocking_dependencies: Vec<String>,
    /// Dependencies with no declared support for this tier
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown_support: Vec<String>,
}

/// A credential a dependency needs at deploy time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRequirement {
    pub dependency: String,
    pub name: String,
    pub description: String,
}

/// Suggested replacement for a dependency that blocks a tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapSuggestion {
    pub dependency: String,
    pub tier: String,
    pub alternatives: Vec<String>,
    pub reason: String,
}

/// Everything known about deploying one scenario, cached per scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentAnalysisReport {
    pub scenario: String,
    pub generated_at: DateTime<Utc>,
    pub tiers: Vec<String>,
    pub dependencies: Vec<DeploymentDependencyNode>,
    pub aggregates: BTreeMap<String, DeploymentTierAggregate>,
    pub secrets: Vec<SecretRequirement>,
    pub swaps: Vec<SwapSuggestion>,
    pub bundle_manifest: BundleManifest,
    /// Blocking threshold the aggregates were computed with
    #[serde(default)]
    pub blocking_threshold: f64,
    /// Scenarios whose manifests fed the tree, the root first
    #[serde(default)]
    pub source_scenarios: Vec<String>,
    /// Scenarios referenced in the tree that had no manifest
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_scenarios: Vec<String>,
}
