use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactSeverity {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for ImpactSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImpactSeverity::None => "none",
            ImpactSeverity::Low => "low",
            ImpactSeverity::Medium => "medium",
            ImpactSeverity::High => "high",
            ImpactSeverity::Critical => "critical",
        };
        f.write_str(name)
    }
}

/// Inferred kind of the dependency under analysis. Unlike
/// [`super::DependencyType`] this admits `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactTarget {
    Scenario,
    Resource,
    SharedWorkflow,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectDependent {
    pub scenario: String,
    pub required: bool,
    pub purpose: String,
    pub access_method: String,
    pub alternatives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndirectDependent {
    pub scenario: String,
    /// The direct dependent this scenario reaches the dependency through
    pub via: String,
    pub required: bool,
}

/// Blast radius of removing one dependency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub dependency_name: String,
    pub dependency_type: ImpactTarget,
    pub direct_dependents: Vec<DirectDependent>,
    pub indirect_dependents: Vec<IndirectDependent>,
    pub required_dependents: usize,
    pub total_affected: usize,
    pub severity: ImpactSeverity,
    pub alternatives: Vec<String>,
    pub recommendations: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}
