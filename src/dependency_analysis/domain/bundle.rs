use super::dependency::DependencyType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A packaging artifact candidate and whether it exists on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleFile {
    pub path: String,
    pub kind: String,
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierSupportSummary {
    pub supported: bool,
    pub fitness_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleDependency {
    pub name: String,
    #[serde(rename = "type")]
    pub dependency_type: DependencyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub tier_support: BTreeMap<String, TierSupportSummary>,
    pub alternatives: Vec<String>,
}

/// Directive to ship `to` in place of `from`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSwap {
    pub from: String,
    pub to: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleManifest {
    pub files: Vec<BundleFile>,
    pub dependencies: Vec<BundleDependency>,
    pub swaps: Vec<BundleSwap>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    #[serde(rename = "type")]
    pub check_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_env: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub interval_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkeletonService {
    pub id: String,
    /// `api`, `ui`, `cli` or `resource`
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    pub health: HealthCheck,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// Deployable description of a scenario, validated against the bundle schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSkeleton {
    pub schema_version: String,
    pub scenario: String,
    pub target_tier: String,
    pub services: Vec<SkeletonService>,
    pub swaps: Vec<BundleSwap>,
}
